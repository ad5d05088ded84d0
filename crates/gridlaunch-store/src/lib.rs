// ABOUTME: Persistence layer for gridlaunch, mirroring the button board and storing file blobs.
// ABOUTME: Provides the text-store and blob-backend ports with in-memory and durable implementations.

pub mod buttons;
pub mod files;
pub mod persister;
pub mod sqlite;
pub mod text;

pub use buttons::{ButtonStore, ButtonStoreError};
pub use files::{BlobBackend, BlobError, FileStore, FileStoreError, MemoryBlobBackend};
pub use persister::{BUTTONS_KEY, PersistError};
pub use sqlite::{DB_FILE_NAME, SCHEMA_VERSION, SqliteBlobBackend};
pub use text::{FileTextStore, MemoryTextStore, TextStore, TextStoreError};
