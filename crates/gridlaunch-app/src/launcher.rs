// ABOUTME: Launcher, the composition root that owns the button store, file store, and URL opener.
// ABOUTME: Exposes the operations a UI layer calls; constructors for production paths and injected test parts.

use std::fs;
use std::sync::Arc;

use gridlaunch_core::{Button, ButtonDraft, ButtonPatch, DisabledOpener, FileRecord, SystemOpener, UrlOpener, open_url};
use gridlaunch_store::{
    BlobBackend, ButtonStore, FileStore, FileStoreError, FileTextStore, SqliteBlobBackend,
    TextStore, TextStoreError,
};
use thiserror::Error;
use tokio::sync::watch;

use crate::config::LauncherConfig;

/// Errors that can occur while assembling a launcher.
#[derive(Debug, Error)]
pub enum LauncherError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("text store error: {0}")]
    TextStore(#[from] TextStoreError),
}

/// Everything the launcher UI talks to. Owns the button list, the file
/// store, and the opener; consumers borrow it rather than reaching for
/// global state.
pub struct Launcher<B = SqliteBlobBackend> {
    buttons: ButtonStore,
    files: FileStore<B>,
    opener: Arc<dyn UrlOpener>,
}

impl Launcher<SqliteBlobBackend> {
    /// Open the launcher rooted at `config.home`. The button list is read
    /// immediately; the blob database is opened on first use.
    ///
    /// Must be called from within a tokio runtime.
    pub fn open(config: &LauncherConfig) -> Result<Self, LauncherError> {
        fs::create_dir_all(&config.home)?;
        let text = Arc::new(FileTextStore::open(&config.text_store_dir())?);

        let opener: Arc<dyn UrlOpener> = if config.open_urls {
            Arc::new(SystemOpener)
        } else {
            Arc::new(DisabledOpener)
        };

        tracing::info!("launcher home at {}", config.home.display());
        Ok(Self::with_parts(
            text,
            SqliteBlobBackend::new(config.blob_db_path()),
            opener,
        ))
    }
}

impl<B: BlobBackend> Launcher<B> {
    /// Assemble a launcher from explicit storage and opener implementations.
    ///
    /// Must be called from within a tokio runtime.
    pub fn with_parts(text: Arc<dyn TextStore>, blobs: B, opener: Arc<dyn UrlOpener>) -> Self {
        Self {
            buttons: ButtonStore::load(text),
            files: FileStore::new(blobs),
            opener,
        }
    }

    pub fn buttons(&self) -> &[Button] {
        self.buttons.buttons()
    }

    pub fn files(&self) -> &FileStore<B> {
        &self.files
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Button>> {
        self.buttons.subscribe()
    }

    pub fn add_button(&mut self, draft: ButtonDraft) -> Button {
        self.buttons.add_button(draft)
    }

    pub fn update_button(&mut self, id: &str, patch: ButtonPatch) {
        self.buttons.update_button(id, patch);
    }

    pub fn delete_button(&mut self, id: &str) {
        self.buttons.delete_button(id);
    }

    /// Open `url` in a new browsing context unless it is missing or the
    /// `"#"` placeholder.
    pub fn open_url(&self, url: Option<&str>) {
        open_url(self.opener.as_ref(), url);
    }

    /// Open the URL of the button with `id`. Unknown ids do nothing.
    pub fn open_button(&self, id: &str) {
        let url = self.buttons.get(id).map(|b| b.url.as_str());
        open_url(self.opener.as_ref(), url);
    }

    pub async fn save_file(
        &self,
        key: &str,
        data: Vec<u8>,
        name: &str,
        mime_type: &str,
    ) -> Result<String, FileStoreError> {
        self.files.save_file(key, data, name, mime_type).await
    }

    pub async fn get_file(&self, key: &str) -> Result<FileRecord, FileStoreError> {
        self.files.get_file(key).await
    }

    pub async fn delete_file(&self, key: &str) -> Result<(), FileStoreError> {
        self.files.delete_file(key).await
    }

    /// Wait until every queued button-list write has finished.
    pub async fn flush(&self) {
        self.buttons.flush().await;
    }
}
