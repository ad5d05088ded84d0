// ABOUTME: Key-value text storage port used to mirror the button list, with memory and file backends.
// ABOUTME: FileTextStore writes each key atomically (temp file, fsync, rename).

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use thiserror::Error;

/// Errors that can occur during text store operations.
#[derive(Debug, Error)]
pub enum TextStoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("storage unavailable")]
    Unavailable,
}

/// Durable string storage addressed by key. Values are overwritten
/// wholesale; there is no partial update.
pub trait TextStore: Send + Sync {
    /// Returns None if nothing is stored under `key`.
    fn get_item(&self, key: &str) -> Result<Option<String>, TextStoreError>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), TextStoreError>;

    /// Removing a key that does not exist is not an error.
    fn remove_item(&self, key: &str) -> Result<(), TextStoreError>;
}

/// In-memory text store. Can be flipped into a failing mode to simulate
/// storage that is full or unavailable.
#[derive(Debug, Default)]
pub struct MemoryTextStore {
    items: Mutex<HashMap<String, String>>,
    failing: AtomicBool,
}

impl MemoryTextStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// When set, every operation returns [`TextStoreError::Unavailable`].
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), TextStoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(TextStoreError::Unavailable);
        }
        Ok(())
    }

    fn items(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, TextStoreError> {
        self.items.lock().map_err(|_| TextStoreError::Unavailable)
    }
}

impl TextStore for MemoryTextStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, TextStoreError> {
        self.check()?;
        Ok(self.items()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), TextStoreError> {
        self.check()?;
        self.items()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), TextStoreError> {
        self.check()?;
        self.items()?.remove(key);
        Ok(())
    }
}

/// Text store keeping one file per key inside a directory.
pub struct FileTextStore {
    dir: PathBuf,
}

impl FileTextStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: &Path) -> Result<Self, TextStoreError> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, TextStoreError> {
        let invalid = key.is_empty()
            || key == "."
            || key == ".."
            || key.contains(['/', '\\'])
            || key.ends_with(".tmp");
        if invalid {
            return Err(TextStoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(key))
    }
}

impl TextStore for FileTextStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, TextStoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), TextStoreError> {
        let final_path = self.path_for(key)?;
        let tmp_path = self.dir.join(format!("{}.tmp", key));

        let written = write_synced(&tmp_path, value).and_then(|()| fs::rename(&tmp_path, &final_path));
        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&tmp_path)
                && cleanup.kind() != std::io::ErrorKind::NotFound
            {
                tracing::warn!("failed to remove {}: {}", tmp_path.display(), cleanup);
            }
            return Err(e.into());
        }
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), TextStoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn write_synced(path: &Path, value: &str) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(value.as_bytes())?;
    file.sync_all()
}
