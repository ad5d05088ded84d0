// ABOUTME: Core library for gridlaunch, containing the launcher's domain types and layout rules.
// ABOUTME: Everything here is I/O free apart from the platform URL opener.

pub mod board;
pub mod button;
pub mod file;
pub mod grid;
pub mod opener;

pub use board::ButtonBoard;
pub use button::{Button, ButtonDraft, ButtonPatch, StoredButton};
pub use file::FileRecord;
pub use grid::{GRID_UNIT, MIN_BUTTON_SIZE, Rect, snap, snap_size};
pub use opener::{DisabledOpener, OpenError, RecordingOpener, SystemOpener, UrlOpener, open_url};
