// ABOUTME: SQLite-backed BlobBackend holding file records in a single keyed `files` table.
// ABOUTME: Opens its connection lazily once, upgrades the schema to version 1, and runs each call in its own transaction.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use gridlaunch_core::FileRecord;
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};
use tokio::sync::OnceCell;

use crate::files::{BlobBackend, BlobError};

/// File name of the blob database inside the launcher home.
pub const DB_FILE_NAME: &str = "launcher-files.db";

/// Schema version stamped into `PRAGMA user_version` once the `files`
/// table exists.
pub const SCHEMA_VERSION: i32 = 1;

/// A blob backend over one SQLite database file.
///
/// The connection is not opened until the first operation. After a
/// successful open it is cached and shared by every later call for the
/// lifetime of the backend. A failed open is not cached, so the next call
/// tries again.
pub struct SqliteBlobBackend {
    path: PathBuf,
    conn: OnceCell<Arc<Mutex<Connection>>>,
}

impl SqliteBlobBackend {
    /// Prepare a backend for the database at `path`. Nothing touches disk
    /// until the first operation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            conn: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True once the connection has been opened.
    pub fn is_open(&self) -> bool {
        self.conn.initialized()
    }

    async fn connection(&self) -> Result<Arc<Mutex<Connection>>, BlobError> {
        let conn = self
            .conn
            .get_or_try_init(|| async {
                let path = self.path.clone();
                let conn = tokio::task::spawn_blocking(move || open_database(&path)).await??;
                Ok::<_, BlobError>(Arc::new(Mutex::new(conn)))
            })
            .await?;
        Ok(Arc::clone(conn))
    }

    /// Run `f` against the shared connection on the blocking pool.
    async fn with_connection<F, T>(&self, f: F) -> Result<T, BlobError>
    where
        F: FnOnce(&mut Connection) -> Result<T, BlobError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.connection().await?;
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock().map_err(|_| BlobError::Unavailable)?;
            f(&mut *guard)
        })
        .await?
    }
}

/// Open the database and make sure the `files` table exists at the
/// current schema version. Safe to run against an already-initialized
/// database.
fn open_database(path: &Path) -> Result<Connection, BlobError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let mut conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let version: i32 = tx.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS files (
            key TEXT PRIMARY KEY,
            data BLOB NOT NULL,
            name TEXT NOT NULL,
            type TEXT NOT NULL,
            timestamp INTEGER NOT NULL
        );",
    )?;

    if version < SCHEMA_VERSION {
        tracing::info!(from = version, to = SCHEMA_VERSION, "upgraded blob store schema");
        tx.execute_batch(&format!("PRAGMA user_version = {};", SCHEMA_VERSION))?;
    }
    tx.commit()?;

    tracing::info!("opened blob store at {}", path.display());
    Ok(conn)
}

#[async_trait]
impl BlobBackend for SqliteBlobBackend {
    async fn put_record(&self, record: &FileRecord) -> Result<(), BlobError> {
        let record = record.clone();
        self.with_connection(move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            tx.execute(
                "INSERT INTO files (key, data, name, type, timestamp)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(key) DO UPDATE SET
                    data = excluded.data,
                    name = excluded.name,
                    type = excluded.type,
                    timestamp = excluded.timestamp",
                params![
                    record.key,
                    record.data,
                    record.name,
                    record.mime_type,
                    record.timestamp,
                ],
            )?;
            tx.commit()?;
            Ok(())
        })
        .await
    }

    async fn get_record(&self, key: &str) -> Result<Option<FileRecord>, BlobError> {
        let key = key.to_string();
        self.with_connection(move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Deferred)?;
            let record = tx
                .query_row(
                    "SELECT key, data, name, type, timestamp FROM files WHERE key = ?1",
                    params![key],
                    |row| {
                        Ok(FileRecord {
                            key: row.get(0)?,
                            data: row.get(1)?,
                            name: row.get(2)?,
                            mime_type: row.get(3)?,
                            timestamp: row.get(4)?,
                        })
                    },
                )
                .optional()?;
            tx.commit()?;
            Ok(record)
        })
        .await
    }

    async fn delete_record(&self, key: &str) -> Result<(), BlobError> {
        let key = key.to_string();
        self.with_connection(move |conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            tx.execute("DELETE FROM files WHERE key = ?1", params![key])?;
            tx.commit()?;
            Ok(())
        })
        .await
    }
}
