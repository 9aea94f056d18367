//! # reel-dl
//!
//! Ephemeral download service for short-form social media videos.
//!
//! A caller submits a video page URL from a supported platform (Instagram,
//! Facebook, YouTube, TikTok by default). The URL is handed to `yt-dlp`,
//! the resulting file is stored under a unique name in a shared directory and
//! served over HTTP, and the file is deleted again once its retention window
//! (10 minutes by default) has passed.
//!
//! ## Design Philosophy
//!
//! - **Ephemeral** - Nothing is persisted; every artifact has a deletion timer
//! - **Isolated jobs** - Concurrent downloads never share file names or state
//! - **Bounded** - Every extractor run has a hard deadline and a concurrency slot
//! - **Event-driven** - Consumers subscribe to events, no polling required
//!
//! ## Quick Start
//!
//! ```no_run
//! use reel_dl::{Config, VideoDownloader};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let downloader = VideoDownloader::new(Config::default()).await?;
//!
//!     // Subscribe to events
//!     let mut events = downloader.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     let artifact = downloader
//!         .download(Some("https://www.instagram.com/reel/C1x2y3z4/"))
//!         .await?;
//!     println!("saved {} ({} bytes)", artifact.file_name, artifact.size_bytes);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// Configuration types
pub mod config;
/// Download job orchestration
pub mod downloader;
/// Error types
pub mod error;
/// Artifact deletion timers and purge
pub mod eviction;
/// External extraction tool invocation and failure classification
pub mod extractor;
/// Job identifiers and output paths
pub mod naming;
/// Locating a finished job's file
pub mod resolver;
/// Core types and events
pub mod types;
/// URL allow-list validation
pub mod validation;

// Re-export commonly used types
pub use config::{Config, PlatformConfig};
pub use downloader::VideoDownloader;
pub use error::{ApiError, DownloadError, Error, Result, ToHttpStatus};
pub use eviction::{EvictionScheduler, EvictionTimer};
pub use extractor::{Extractor, InvocationOutcome, YtDlpExtractor};
pub use types::{Artifact, Event, JobId, OutputPathTemplate};

/// Run the HTTP API until a termination signal arrives.
///
/// On SIGTERM or SIGINT the downloader stops accepting downloads, its
/// eviction timers are cancelled, and the server drains open connections.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
///
/// # Example
///
/// ```no_run
/// use reel_dl::{Config, VideoDownloader, run_with_shutdown};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let downloader = VideoDownloader::new(Config::default()).await?;
///
///     // Serve with automatic signal handling
///     run_with_shutdown(downloader).await?;
///
///     Ok(())
/// }
/// ```
pub async fn run_with_shutdown(downloader: VideoDownloader) -> Result<()> {
    api::start_api_server(std::sync::Arc::new(downloader), wait_for_signal()).await
}

/// Resolve on the first SIGTERM or SIGINT
///
/// A signal whose handler cannot be registered (restricted containers) is
/// logged and never fires; the other one still does.
#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    async fn wait_for(kind: SignalKind, name: &'static str) {
        match signal(kind) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!(signal = name, "shutdown signal received");
            }
            Err(e) => {
                tracing::warn!(signal = name, error = %e, "could not register signal handler");
                std::future::pending::<()>().await;
            }
        }
    }

    tokio::select! {
        _ = wait_for(SignalKind::terminate(), "SIGTERM") => {}
        _ = wait_for(SignalKind::interrupt(), "SIGINT") => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "could not listen for Ctrl+C, shutting down");
        return;
    }
    tracing::info!(signal = "Ctrl+C", "shutdown signal received");
}
