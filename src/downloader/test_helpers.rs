//! Shared test helpers for creating VideoDownloader instances in tests.

use crate::config::Config;
use crate::downloader::VideoDownloader;
use crate::extractor::{Extractor, InvocationOutcome};
use crate::types::{EXT_PLACEHOLDER, OutputPathTemplate};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::tempdir;

/// What a [`MockExtractor`] does when invoked
#[derive(Debug, Clone)]
pub(crate) enum MockBehavior {
    /// Write `bytes` to the template with `ext` substituted, exit 0
    Produce { ext: &'static str, bytes: Vec<u8> },
    /// Exit 0 without writing anything
    ProduceNothing,
    /// Exit non-zero with the given stderr
    Fail { exit_code: i32, stderr: &'static str },
    /// Write scratch files for the template, then exit non-zero
    FailWithLeftovers { stderr: &'static str },
    /// Report a run killed at its deadline
    Timeout,
    /// Fail to start at all
    Unrunnable,
}

/// In-process stand-in for yt-dlp
pub(crate) struct MockExtractor {
    behavior: MockBehavior,
    delay: Duration,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockExtractor {
    pub(crate) fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Writes a small mp4 for every call
    pub(crate) fn producing_mp4() -> Self {
        Self::new(MockBehavior::Produce {
            ext: "mp4",
            bytes: b"\x00\x00\x00\x18ftypmp42 fake video".to_vec(),
        })
    }

    /// Sleep this long inside every call
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of calls that were running at once
    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Extractor for MockExtractor {
    async fn extract(
        &self,
        _url: &str,
        template: &OutputPathTemplate,
    ) -> crate::Result<InvocationOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let outcome = match &self.behavior {
            MockBehavior::Produce { ext, bytes } => {
                let path = template.to_string().replace(EXT_PLACEHOLDER, ext);
                match tokio::fs::write(&path, bytes).await {
                    Ok(()) => Ok(InvocationOutcome::success(self.delay)),
                    Err(e) => Err(e.into()),
                }
            }
            MockBehavior::ProduceNothing => Ok(InvocationOutcome::success(self.delay)),
            MockBehavior::Fail { exit_code, stderr } => Ok(InvocationOutcome::failure(
                Some(*exit_code),
                *stderr,
                self.delay,
            )),
            MockBehavior::FailWithLeftovers { stderr } => {
                let mut result = Ok(InvocationOutcome::failure(Some(1), *stderr, self.delay));
                for ext in ["mp4.part", "f137.mp4", "mp4.ytdl"] {
                    let path = template.to_string().replace(EXT_PLACEHOLDER, ext);
                    if let Err(e) = tokio::fs::write(&path, b"partial").await {
                        result = Err(e.into());
                    }
                }
                result
            }
            MockBehavior::Timeout => Ok(InvocationOutcome::timeout("", self.delay)),
            MockBehavior::Unrunnable => Err(crate::Error::ExternalTool(
                "Failed to execute mock: No such file or directory".into(),
            )),
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        outcome
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Test config rooted in `dir`
pub(crate) fn test_config(dir: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.download.output_dir = dir.join("public").join("videos");
    config.download.max_concurrent_downloads = 3;
    config.server.api.public_dir = dir.join("public");
    config
}

/// Helper to create a test VideoDownloader around `extractor`.
/// Returns the downloader and the tempdir (which must be kept alive).
pub(crate) async fn create_test_downloader(
    extractor: Arc<MockExtractor>,
) -> (VideoDownloader, tempfile::TempDir) {
    let temp_dir = tempdir().unwrap();
    let config = test_config(temp_dir.path());
    let downloader = VideoDownloader::with_extractor(config, extractor)
        .await
        .unwrap();
    (downloader, temp_dir)
}

pub(crate) const INSTAGRAM_URL: &str = "https://www.instagram.com/reel/C1x2y3z4/";
pub(crate) const YOUTUBE_URL: &str = "https://youtu.be/dQw4w9WgXcQ";
