//! Extraction tool invocation
//!
//! Downloading and transcoding are delegated to an external tool (yt-dlp).
//! The core abstraction is the [`Extractor`] trait, which runs the tool once
//! for one URL and output template and reports how the run ended:
//!
//! - [`YtDlpExtractor`]: runs the `yt-dlp` binary as a bounded subprocess
//! - [`UnavailableExtractor`]: stand-in when no binary could be found
//!
//! Failed runs are mapped onto the user-facing taxonomy by the
//! [`ErrorClassifier`].
//!
//! ## Usage
//!
//! ```no_run
//! use reel_dl::extractor::{Extractor, YtDlpExtractor};
//! use reel_dl::config::ToolsConfig;
//! use reel_dl::naming::name_job;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let extractor = YtDlpExtractor::from_path(&ToolsConfig::default())
//!     .expect("yt-dlp not found in PATH");
//!
//! let (_job_id, template) = name_job(Path::new("./public/videos"));
//! let outcome = extractor
//!     .extract("https://youtu.be/dQw4w9WgXcQ", &template)
//!     .await?;
//! println!("exited cleanly: {}", outcome.exited_cleanly);
//! # Ok(())
//! # }
//! ```

mod classifier;
mod cli;
mod traits;
mod unavailable;

pub use classifier::ErrorClassifier;
pub use cli::YtDlpExtractor;
pub use traits::{Extractor, InvocationOutcome};
pub use unavailable::UnavailableExtractor;
