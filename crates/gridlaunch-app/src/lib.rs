// ABOUTME: Composition root for gridlaunch, wiring configuration, storage, and URL opening together.
// ABOUTME: Re-exports the Launcher surface and its configuration types.

pub mod config;
pub mod launcher;

pub use config::{ConfigError, LauncherConfig};
pub use launcher::{Launcher, LauncherError};
