// ABOUTME: ButtonStore pairs the in-memory ButtonBoard with its durable text-store mirror.
// ABOUTME: Loads once at startup, recovers from bad data, and persists after every mutation.

use std::sync::Arc;

use gridlaunch_core::{Button, ButtonBoard, ButtonDraft, ButtonPatch, StoredButton};
use thiserror::Error;
use tokio::sync::watch;

use crate::persister::{self, BUTTONS_KEY, PersistError, PersisterHandle};
use crate::text::{TextStore, TextStoreError};

/// Errors that can occur when reading or explicitly writing the button
/// list. Mutations themselves never return these.
#[derive(Debug, Error)]
pub enum ButtonStoreError {
    #[error("storage error: {0}")]
    Storage(#[from] TextStoreError),

    #[error("stored button list is malformed: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

/// The authoritative list of launcher buttons for a session, mirrored to a
/// [`TextStore`] after every change.
///
/// The in-memory board is always current. Durable writes happen on a
/// background task; a failed write is logged and the in-memory state is
/// kept.
pub struct ButtonStore {
    board: ButtonBoard,
    persister: PersisterHandle,
    changes: watch::Sender<Vec<Button>>,
}

impl ButtonStore {
    /// Load the button list from `store` and start the persister. A
    /// missing, unreadable, or malformed list yields an empty board; the
    /// failure is logged rather than returned.
    ///
    /// Must be called from within a tokio runtime.
    pub fn load(store: Arc<dyn TextStore>) -> Self {
        let board = match read_board(store.as_ref()) {
            Ok(board) => {
                tracing::info!(count = board.len(), "loaded buttons from storage");
                board
            }
            Err(e) => {
                tracing::error!("error loading buttons from storage: {}", e);
                ButtonBoard::new()
            }
        };

        let (changes, _) = watch::channel(board.buttons().to_vec());

        Self {
            board,
            persister: persister::spawn(store),
            changes,
        }
    }

    pub fn buttons(&self) -> &[Button] {
        self.board.buttons()
    }

    pub fn get(&self, id: &str) -> Option<&Button> {
        self.board.get(id)
    }

    /// Subscribe to the button list. The receiver observes the full list
    /// after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Button>> {
        self.changes.subscribe()
    }

    /// Add a button with defaults and automatic placement, then persist.
    pub fn add_button(&mut self, draft: ButtonDraft) -> Button {
        let button = self.board.add(draft);
        self.changed();
        button
    }

    /// Merge `patch` into the button with `id`, then persist. Unknown ids
    /// are ignored. Returns whether a button was updated.
    pub fn update_button(&mut self, id: &str, patch: ButtonPatch) -> bool {
        let updated = self.board.update(id, patch);
        if updated {
            self.changed();
        }
        updated
    }

    /// Remove the button with `id`, then persist. Unknown ids are ignored.
    /// Returns whether a button was removed.
    pub fn delete_button(&mut self, id: &str) -> bool {
        let removed = self.board.delete(id);
        if removed {
            self.changed();
        }
        removed
    }

    /// Queue a write of the current list without waiting for it.
    pub fn persist(&self) {
        self.persister.save(self.board.buttons().to_vec());
    }

    /// Write the current list and wait for the result. Earlier queued
    /// writes land first, so the stored list matches memory on success.
    pub async fn persist_now(&self) -> Result<(), ButtonStoreError> {
        self.persister
            .save_and_wait(self.board.buttons().to_vec())
            .await?;
        Ok(())
    }

    /// Wait for every queued write to finish.
    pub async fn flush(&self) {
        self.persister.flush().await;
    }

    fn changed(&self) {
        self.changes.send_replace(self.board.buttons().to_vec());
        self.persist();
    }
}

fn read_board(store: &dyn TextStore) -> Result<ButtonBoard, ButtonStoreError> {
    let Some(raw) = store.get_item(BUTTONS_KEY)? else {
        return Ok(ButtonBoard::new());
    };
    if raw.trim().is_empty() {
        return Ok(ButtonBoard::new());
    }

    let stored: Vec<StoredButton> = serde_json::from_str(&raw)?;
    Ok(ButtonBoard::from_stored(stored))
}
