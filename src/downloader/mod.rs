//! Download job orchestration.
//!
//! The `VideoDownloader` struct and its methods are organized by domain:
//! - [`job`] - One download from URL to armed artifact
//! - [`lifecycle`] - Purge and shutdown coordination

mod job;
mod lifecycle;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::eviction::EvictionScheduler;
use crate::extractor::{ErrorClassifier, Extractor, UnavailableExtractor, YtDlpExtractor};
use crate::types::Event;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Main downloader instance (cloneable - all fields are Arc-wrapped)
///
/// Holds no per-job state: every call to [`download`](Self::download) names
/// its own job, so concurrent requests never share anything but the output
/// directory and the eviction scheduler.
#[derive(Clone)]
pub struct VideoDownloader {
    /// Configuration (wrapped in Arc for sharing across tasks)
    pub(crate) config: Arc<Config>,
    /// Tool that fetches a URL into a file (trait object for pluggable implementations)
    pub(crate) extractor: Arc<dyn Extractor>,
    /// Maps failed runs to user-facing errors
    pub(crate) classifier: ErrorClassifier,
    /// Owns the deletion of every artifact
    pub(crate) eviction: EvictionScheduler,
    /// Event broadcast channel sender (multiple subscribers supported)
    pub(crate) event_tx: tokio::sync::broadcast::Sender<Event>,
    /// Semaphore to limit concurrent extractor runs
    pub(crate) concurrent_limit: Arc<tokio::sync::Semaphore>,
    /// Flag to indicate whether new downloads are accepted (set to false during shutdown)
    pub(crate) accepting_new: Arc<AtomicBool>,
}

impl VideoDownloader {
    /// Create a new VideoDownloader instance
    ///
    /// Creates the output directory if needed and picks the extractor:
    /// `tools.ytdlp_path` when set, otherwise `yt-dlp` from the PATH. When
    /// neither exists the downloader still starts, but every download fails.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the output
    /// directory cannot be created.
    pub async fn new(config: Config) -> Result<Self> {
        let extractor: Arc<dyn Extractor> = match YtDlpExtractor::from_config(&config.tools) {
            Some(extractor) => {
                tracing::info!(binary = %extractor.binary_path().display(), "using yt-dlp");
                Arc::new(extractor)
            }
            None => {
                tracing::warn!("yt-dlp not found in PATH and no tools.ytdlp_path set; downloads will fail");
                Arc::new(UnavailableExtractor)
            }
        };
        Self::with_extractor(config, extractor).await
    }

    /// Create a VideoDownloader that uses `extractor` instead of yt-dlp
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the output
    /// directory cannot be created.
    pub async fn with_extractor(config: Config, extractor: Arc<dyn Extractor>) -> Result<Self> {
        config.validate()?;

        tokio::fs::create_dir_all(config.output_dir())
            .await
            .map_err(|e| {
                Error::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to create output directory '{}': {}",
                        config.output_dir().display(),
                        e
                    ),
                ))
            })?;

        // Create broadcast channel with buffer size of 1000 events
        let (event_tx, _rx) = tokio::sync::broadcast::channel(1000);

        let classifier =
            ErrorClassifier::new(&config.classification, config.tools.invocation_timeout);
        let eviction = EvictionScheduler::new(
            config.output_dir().clone(),
            config.download.retention,
            event_tx.clone(),
        );
        let concurrent_limit = Arc::new(tokio::sync::Semaphore::new(
            config.download.max_concurrent_downloads,
        ));

        tracing::debug!(
            extractor = extractor.name(),
            output_dir = %config.output_dir().display(),
            retention_secs = config.download.retention.as_secs(),
            "downloader initialized"
        );

        Ok(Self {
            config: Arc::new(config),
            extractor,
            classifier,
            eviction,
            event_tx,
            concurrent_limit,
            accepting_new: Arc::new(AtomicBool::new(true)),
        })
    }

    /// Subscribe to downloader events
    ///
    /// Each subscriber receives every event emitted after it subscribed.
    /// A subscriber that falls more than 1000 events behind sees
    /// `RecvError::Lagged` and skips ahead.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Emit an event; having no subscribers is not an error
    pub(crate) fn emit_event(&self, event: Event) {
        self.event_tx.send(event).ok();
    }

    /// Configuration this downloader was built with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether new downloads are currently accepted
    pub fn is_accepting(&self) -> bool {
        self.accepting_new.load(Ordering::SeqCst)
    }

    /// Scheduler that owns artifact deletion
    pub fn eviction(&self) -> &EvictionScheduler {
        &self.eviction
    }
}
