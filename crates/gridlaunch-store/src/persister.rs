// ABOUTME: Background task that mirrors button list snapshots into a TextStore.
// ABOUTME: Fed through an mpsc channel so mutations never wait on or fail because of disk writes.

use std::sync::Arc;

use gridlaunch_core::Button;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use crate::text::{TextStore, TextStoreError};

/// Storage key holding the serialized button list.
pub const BUTTONS_KEY: &str = "web-launcher-buttons";

/// Errors that can occur while writing a snapshot.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage error: {0}")]
    Storage(#[from] TextStoreError),

    #[error("persister task has stopped")]
    Closed,
}

enum PersistMessage {
    Save(Vec<Button>),
    SaveAndReply(Vec<Button>, oneshot::Sender<Result<(), PersistError>>),
    Flush(oneshot::Sender<()>),
}

/// Handle for queueing snapshots to the persister task. The task exits
/// once every handle is dropped.
#[derive(Clone)]
pub struct PersisterHandle {
    tx: mpsc::UnboundedSender<PersistMessage>,
}

impl PersisterHandle {
    /// Queue a snapshot without waiting for it. A burst of queued
    /// snapshots may be collapsed into a single write of the newest one.
    pub fn save(&self, buttons: Vec<Button>) {
        if self.tx.send(PersistMessage::Save(buttons)).is_err() {
            tracing::error!("error saving buttons to storage: {}", PersistError::Closed);
        }
    }

    /// Queue a snapshot and wait for the write result. Snapshots queued
    /// earlier are written first.
    pub async fn save_and_wait(&self, buttons: Vec<Button>) -> Result<(), PersistError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(PersistMessage::SaveAndReply(buttons, reply_tx))
            .map_err(|_| PersistError::Closed)?;
        reply_rx.await.map_err(|_| PersistError::Closed)?
    }

    /// Wait until every snapshot queued before this call has been written
    /// or has failed.
    pub async fn flush(&self) {
        let (reply_tx, reply_rx) = oneshot::channel();
        if self.tx.send(PersistMessage::Flush(reply_tx)).is_ok() {
            let _ = reply_rx.await;
        }
    }
}

/// Spawn the persister task writing into `store`. Must be called from
/// within a tokio runtime.
pub fn spawn(store: Arc<dyn TextStore>) -> PersisterHandle {
    let (tx, rx) = mpsc::unbounded_channel();
    let persister = Persister { store, rx };
    tokio::spawn(persister.run());
    PersisterHandle { tx }
}

/// Serialize `buttons` and overwrite the stored list.
pub fn write_snapshot(store: &dyn TextStore, buttons: &[Button]) -> Result<(), PersistError> {
    let json = serde_json::to_string(buttons)?;
    store.set_item(BUTTONS_KEY, &json)?;
    tracing::debug!(count = buttons.len(), "buttons saved to storage");
    Ok(())
}

struct Persister {
    store: Arc<dyn TextStore>,
    rx: mpsc::UnboundedReceiver<PersistMessage>,
}

impl Persister {
    async fn run(mut self) {
        let mut next: Option<PersistMessage> = None;

        loop {
            let msg = match next.take() {
                Some(msg) => msg,
                None => match self.rx.recv().await {
                    Some(msg) => msg,
                    None => break,
                },
            };

            match msg {
                PersistMessage::Save(mut buttons) => {
                    while let Ok(following) = self.rx.try_recv() {
                        match following {
                            PersistMessage::Save(newer) => buttons = newer,
                            other => {
                                next = Some(other);
                                break;
                            }
                        }
                    }
                    if let Err(e) = write_snapshot(self.store.as_ref(), &buttons) {
                        tracing::error!("error saving buttons to storage: {}", e);
                    }
                }
                PersistMessage::SaveAndReply(buttons, reply) => {
                    let result = write_snapshot(self.store.as_ref(), &buttons);
                    if let Err(e) = &result {
                        tracing::error!("error saving buttons to storage: {}", e);
                    }
                    // The caller may have stopped waiting
                    let _ = reply.send(result);
                }
                PersistMessage::Flush(reply) => {
                    let _ = reply.send(());
                }
            }
        }

        tracing::debug!("button persister stopped");
    }
}
