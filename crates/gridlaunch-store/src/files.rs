// ABOUTME: Blob storage port and the FileStore facade for saving, reading, and deleting files by key.
// ABOUTME: Distinguishes a missing key from backend failures; includes an in-memory backend for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use gridlaunch_core::FileRecord;
use thiserror::Error;
use tokio::sync::RwLock;

/// Errors raised by a blob backend. These are storage-layer failures; a
/// missing key is not an error at this level.
#[derive(Debug, Error)]
pub enum BlobError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("blob worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),

    #[error("blob store unavailable")]
    Unavailable,
}

/// Errors returned by [`FileStore`] operations.
#[derive(Debug, Error)]
pub enum FileStoreError {
    #[error("file not found: {0}")]
    NotFound(String),

    #[error("storage error: {0}")]
    Backend(#[from] BlobError),
}

impl FileStoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FileStoreError::NotFound(_))
    }
}

/// Durable keyed storage for file records. Each call is independent and
/// atomic on its own; implementations provide their own isolation.
#[async_trait]
pub trait BlobBackend: Send + Sync {
    /// Insert or overwrite the record stored under `record.key`.
    async fn put_record(&self, record: &FileRecord) -> Result<(), BlobError>;

    /// Returns None if nothing is stored under `key`.
    async fn get_record(&self, key: &str) -> Result<Option<FileRecord>, BlobError>;

    /// Deleting a key that does not exist succeeds.
    async fn delete_record(&self, key: &str) -> Result<(), BlobError>;
}

/// In-memory blob backend. Can be flipped into a failing mode to simulate
/// an unavailable storage engine.
#[derive(Debug, Default)]
pub struct MemoryBlobBackend {
    records: RwLock<HashMap<String, FileRecord>>,
    failing: AtomicBool,
}

impl MemoryBlobBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// When set, every operation returns [`BlobError::Unavailable`].
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn check(&self) -> Result<(), BlobError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(BlobError::Unavailable);
        }
        Ok(())
    }
}

#[async_trait]
impl BlobBackend for MemoryBlobBackend {
    async fn put_record(&self, record: &FileRecord) -> Result<(), BlobError> {
        self.check()?;
        self.records
            .write()
            .await
            .insert(record.key.clone(), record.clone());
        Ok(())
    }

    async fn get_record(&self, key: &str) -> Result<Option<FileRecord>, BlobError> {
        self.check()?;
        Ok(self.records.read().await.get(key).cloned())
    }

    async fn delete_record(&self, key: &str) -> Result<(), BlobError> {
        self.check()?;
        self.records.write().await.remove(key);
        Ok(())
    }
}

/// File persistence keyed by caller-chosen identifiers. Last write wins;
/// there is no caching layer, so every read goes to the backend.
pub struct FileStore<B> {
    backend: B,
}

impl<B: BlobBackend> FileStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Store `data` with its metadata under `key`, replacing anything
    /// already there. Returns the key on success.
    pub async fn save_file(
        &self,
        key: &str,
        data: Vec<u8>,
        name: &str,
        mime_type: &str,
    ) -> Result<String, FileStoreError> {
        let record = FileRecord {
            key: key.to_string(),
            data,
            name: name.to_string(),
            mime_type: mime_type.to_string(),
            timestamp: Utc::now().timestamp_millis(),
        };

        if let Err(e) = self.backend.put_record(&record).await {
            tracing::error!("error saving file {}: {}", key, e);
            return Err(e.into());
        }

        tracing::debug!(key, name, bytes = record.size(), "file saved");
        Ok(record.key)
    }

    /// Fetch the record stored under `key`. A key that was never saved, or
    /// has been deleted, yields [`FileStoreError::NotFound`].
    pub async fn get_file(&self, key: &str) -> Result<FileRecord, FileStoreError> {
        match self.backend.get_record(key).await {
            Ok(Some(record)) => Ok(record),
            Ok(None) => Err(FileStoreError::NotFound(key.to_string())),
            Err(e) => {
                tracing::error!("error getting file {}: {}", key, e);
                Err(e.into())
            }
        }
    }

    /// Remove the record under `key`. Succeeds whether or not it existed.
    pub async fn delete_file(&self, key: &str) -> Result<(), FileStoreError> {
        if let Err(e) = self.backend.delete_record(key).await {
            tracing::error!("error deleting file {}: {}", key, e);
            return Err(e.into());
        }
        tracing::debug!(key, "file deleted");
        Ok(())
    }

    /// True when a record exists under `key`.
    pub async fn contains(&self, key: &str) -> Result<bool, FileStoreError> {
        match self.get_file(key).await {
            Ok(_) => Ok(true),
            Err(FileStoreError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes() -> Vec<u8> {
        vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0xff]
    }

    #[tokio::test]
    async fn save_then_get_round_trips() {
        let files = FileStore::new(MemoryBlobBackend::new());

        let before = Utc::now().timestamp_millis();
        let key = files
            .save_file("icon-1", png_bytes(), "a.png", "image/png")
            .await
            .unwrap();
        assert_eq!(key, "icon-1");

        let record = files.get_file("icon-1").await.unwrap();
        assert_eq!(record.data, png_bytes());
        assert_eq!(record.name, "a.png");
        assert_eq!(record.mime_type, "image/png");
        assert_eq!(record.key, "icon-1");
        assert!(record.timestamp >= before);
    }

    #[tokio::test]
    async fn save_overwrites_existing_key() {
        let files = FileStore::new(MemoryBlobBackend::new());
        files
            .save_file("k", vec![1, 2, 3], "old.bin", "application/octet-stream")
            .await
            .unwrap();
        files
            .save_file("k", vec![9], "new.txt", "text/plain")
            .await
            .unwrap();

        let record = files.get_file("k").await.unwrap();
        assert_eq!(record.data, vec![9]);
        assert_eq!(record.name, "new.txt");
        assert_eq!(files.backend().len().await, 1);
    }

    #[tokio::test]
    async fn get_missing_key_is_not_found() {
        let files = FileStore::new(MemoryBlobBackend::new());

        let err = files.get_file("never-saved").await.unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("never-saved"));
    }

    #[tokio::test]
    async fn backend_failure_is_distinct_from_not_found() {
        let files = FileStore::new(MemoryBlobBackend::new());
        files.backend().set_failing(true);

        let err = files.get_file("k").await.unwrap_err();
        assert!(!err.is_not_found());
        assert!(matches!(err, FileStoreError::Backend(BlobError::Unavailable)));

        let err = files
            .save_file("k", vec![1], "a", "text/plain")
            .await
            .unwrap_err();
        assert!(matches!(err, FileStoreError::Backend(_)));

        let err = files.delete_file("k").await.unwrap_err();
        assert!(matches!(err, FileStoreError::Backend(_)));
    }

    #[tokio::test]
    async fn delete_missing_key_succeeds() {
        let files = FileStore::new(MemoryBlobBackend::new());
        files.delete_file("nothing-here").await.unwrap();
    }

    #[tokio::test]
    async fn deleted_key_is_not_found() {
        let files = FileStore::new(MemoryBlobBackend::new());
        files
            .save_file("k", vec![1], "a.txt", "text/plain")
            .await
            .unwrap();
        assert!(files.contains("k").await.unwrap());

        files.delete_file("k").await.unwrap();

        assert!(files.get_file("k").await.unwrap_err().is_not_found());
        assert!(!files.contains("k").await.unwrap());
        assert!(files.backend().is_empty().await);
    }
}
