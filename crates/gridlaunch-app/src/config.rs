// ABOUTME: Configuration loading for the gridlaunch launcher.
// ABOUTME: Reads GRIDLAUNCH_* environment variables and derives storage paths under the home directory.

use std::path::PathBuf;

use gridlaunch_store::DB_FILE_NAME;
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a boolean (true/false/1/0/yes/no), got {value:?}")]
    InvalidBool { name: &'static str, value: String },
}

/// Launcher configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherConfig {
    pub home: PathBuf,
    pub open_urls: bool,
}

impl LauncherConfig {
    /// Build a configuration rooted at `home` with URL opening enabled.
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self {
            home: home.into(),
            open_urls: true,
        }
    }

    /// Load configuration from environment variables with sensible defaults.
    ///
    /// Environment variables:
    /// - GRIDLAUNCH_HOME: data directory (default: ~/.gridlaunch)
    /// - GRIDLAUNCH_OPEN_URLS: dispatch URLs to the platform browser (default: true)
    pub fn from_env() -> Result<Self, ConfigError> {
        let home = std::env::var("GRIDLAUNCH_HOME")
            .ok()
            .filter(|h| !h.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                std::env::var("HOME")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("/tmp"))
                    .join(".gridlaunch")
            });

        let open_urls = match std::env::var("GRIDLAUNCH_OPEN_URLS") {
            Ok(value) => parse_bool("GRIDLAUNCH_OPEN_URLS", &value)?,
            Err(_) => true,
        };

        Ok(Self { home, open_urls })
    }

    /// Directory holding the key-value text entries.
    pub fn text_store_dir(&self) -> PathBuf {
        self.home.join("local-storage")
    }

    /// Path of the SQLite blob database.
    pub fn blob_db_path(&self) -> PathBuf {
        self.home.join(DB_FILE_NAME)
    }
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            name,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Both env-driven cases live in one test so they cannot race each other.
    #[test]
    fn config_from_env() {
        // SAFETY: test-only code; no other test in this crate touches these variables
        unsafe {
            std::env::remove_var("GRIDLAUNCH_HOME");
            std::env::remove_var("GRIDLAUNCH_OPEN_URLS");
        }

        let config = LauncherConfig::from_env().unwrap();
        assert!(config.home.to_string_lossy().contains(".gridlaunch"));
        assert!(config.open_urls);

        // SAFETY: as above
        unsafe {
            std::env::set_var("GRIDLAUNCH_HOME", "/var/lib/gridlaunch");
            std::env::set_var("GRIDLAUNCH_OPEN_URLS", "no");
        }
        let config = LauncherConfig::from_env().unwrap();
        assert_eq!(config.home, PathBuf::from("/var/lib/gridlaunch"));
        assert!(!config.open_urls);

        // SAFETY: as above
        unsafe {
            std::env::set_var("GRIDLAUNCH_OPEN_URLS", "sometimes");
        }
        let result = LauncherConfig::from_env();

        // Clean up before asserting
        // SAFETY: as above
        unsafe {
            std::env::remove_var("GRIDLAUNCH_HOME");
            std::env::remove_var("GRIDLAUNCH_OPEN_URLS");
        }

        let err = result.unwrap_err();
        assert!(
            err.to_string().contains("GRIDLAUNCH_OPEN_URLS"),
            "error should name the variable: {}",
            err
        );
    }

    #[test]
    fn paths_derive_from_home() {
        let config = LauncherConfig::new("/data/launcher");
        assert_eq!(config.text_store_dir(), PathBuf::from("/data/launcher/local-storage"));
        assert_eq!(
            config.blob_db_path(),
            PathBuf::from("/data/launcher/launcher-files.db")
        );
    }

    #[test]
    fn parse_bool_accepts_common_spellings() {
        assert!(parse_bool("X", "TRUE").unwrap());
        assert!(parse_bool("X", " 1 ").unwrap());
        assert!(!parse_bool("X", "No").unwrap());
        assert!(parse_bool("X", "").is_err());
    }
}
