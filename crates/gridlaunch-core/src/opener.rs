// ABOUTME: UrlOpener trait for launching a button's target in a new browsing context.
// ABOUTME: Includes the platform opener and a recording double used by tests.

use std::sync::Mutex;

use thiserror::Error;

use crate::button::PLACEHOLDER_URL;

/// Errors that can occur while handing a URL to the platform.
#[derive(Debug, Error)]
pub enum OpenError {
    #[error("failed to launch {url}: {source}")]
    Launch {
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error("url opening is disabled")]
    Disabled,
}

/// Something that can navigate to a URL outside this process.
pub trait UrlOpener: Send + Sync {
    fn open(&self, url: &str) -> Result<(), OpenError>;
}

/// Open `url` through `opener` unless it is missing, empty, or the `"#"`
/// placeholder. Returns true when a navigation was dispatched. Opener
/// failures are logged and swallowed; a disabled opener is not a failure.
pub fn open_url(opener: &dyn UrlOpener, url: Option<&str>) -> bool {
    let Some(url) = url.filter(|u| !u.is_empty() && *u != PLACEHOLDER_URL) else {
        return false;
    };

    match opener.open(url) {
        Ok(()) => {
            tracing::debug!(url, "opened url");
            true
        }
        Err(OpenError::Disabled) => {
            tracing::debug!(url, "url opening disabled");
            false
        }
        Err(e) => {
            tracing::error!("failed to open {}: {}", url, e);
            false
        }
    }
}

/// Opens URLs with the operating system's default handler. The handler
/// runs detached, so the launched browser holds no reference back to this
/// process and receives no referrer.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

impl UrlOpener for SystemOpener {
    fn open(&self, url: &str) -> Result<(), OpenError> {
        open::that_detached(url).map_err(|source| OpenError::Launch {
            url: url.to_string(),
            source,
        })
    }
}

/// Logs the URL instead of launching anything. Used on headless hosts.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledOpener;

impl UrlOpener for DisabledOpener {
    fn open(&self, url: &str) -> Result<(), OpenError> {
        tracing::info!(url, "url opening disabled, not launching");
        Err(OpenError::Disabled)
    }
}

/// Records every URL it is asked to open.
#[derive(Debug, Default)]
pub struct RecordingOpener {
    opened: Mutex<Vec<String>>,
}

impl RecordingOpener {
    pub fn new() -> Self {
        Self::default()
    }

    /// URLs opened so far, oldest first.
    pub fn opened(&self) -> Vec<String> {
        self.opened
            .lock()
            .map(|urls| urls.clone())
            .unwrap_or_default()
    }
}

impl UrlOpener for RecordingOpener {
    fn open(&self, url: &str) -> Result<(), OpenError> {
        if let Ok(mut urls) = self.opened.lock() {
            urls.push(url.to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tracing::{Level, Subscriber};
    use tracing_subscriber::Layer;
    use tracing_subscriber::layer::{Context, SubscriberExt};

    #[test]
    fn placeholder_and_missing_urls_are_ignored() {
        let opener = RecordingOpener::new();

        assert!(!open_url(&opener, Some("#")));
        assert!(!open_url(&opener, None));
        assert!(!open_url(&opener, Some("")));

        assert!(opener.opened().is_empty());
    }

    #[test]
    fn real_url_opens_exactly_once() {
        let opener = RecordingOpener::new();

        assert!(open_url(&opener, Some("https://x")));

        assert_eq!(opener.opened(), vec!["https://x".to_string()]);
    }

    struct BrokenOpener;

    impl UrlOpener for BrokenOpener {
        fn open(&self, url: &str) -> Result<(), OpenError> {
            Err(OpenError::Launch {
                url: url.to_string(),
                source: std::io::Error::other("no handler"),
            })
        }
    }

    /// Collects the level of every event emitted while installed.
    #[derive(Clone, Default)]
    struct LevelRecorder(Arc<Mutex<Vec<Level>>>);

    impl<S: Subscriber> Layer<S> for LevelRecorder {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            self.0.lock().unwrap().push(*event.metadata().level());
        }
    }

    fn levels_while(f: impl FnOnce()) -> Vec<Level> {
        let recorder = LevelRecorder::default();
        let subscriber = tracing_subscriber::registry().with(recorder.clone());
        tracing::subscriber::with_default(subscriber, f);
        let levels = recorder.0.lock().unwrap().clone();
        levels
    }

    #[test]
    fn opener_failure_is_swallowed_and_logged_as_error() {
        let levels = levels_while(|| {
            assert!(!open_url(&BrokenOpener, Some("https://example.com")));
        });
        assert!(levels.contains(&Level::ERROR));
    }

    #[test]
    fn disabled_opener_does_not_log_errors() {
        let levels = levels_while(|| {
            assert!(!open_url(&DisabledOpener, Some("https://example.com")));
        });
        assert!(!levels.is_empty());
        assert!(!levels.contains(&Level::ERROR), "got {:?}", levels);
    }

    #[test]
    fn launch_error_mentions_url() {
        let err = OpenError::Launch {
            url: "https://example.com".to_string(),
            source: std::io::Error::other("no handler"),
        };
        assert!(err.to_string().contains("https://example.com"));
    }
}
