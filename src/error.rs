//! Error types for reel-dl
//!
//! This module provides error handling for the library, including:
//! - The download failure taxonomy surfaced to callers ([`DownloadError`])
//! - HTTP status code mapping for API integration
//! - The JSON error body returned by every failing endpoint

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for reel-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Generic message returned for any error that is not part of the download taxonomy
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Main error type for reel-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "output_dir")
        key: Option<String>,
    },

    /// A download job failed; the variant says why
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Shutdown in progress - not accepting new downloads
    #[error("shutdown in progress: not accepting new downloads")]
    ShuttingDown,

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),

    /// External tool could not be executed (missing binary, broken pipe, ...)
    #[error("external tool error: {0}")]
    ExternalTool(String),
}

/// Why a download job did not produce an artifact
///
/// The `Display` text of each variant is the one-line message shown to the
/// client. Raw extractor output never ends up in here; it is logged instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DownloadError {
    /// URL missing, empty or whitespace-only
    #[error("URL is required")]
    InvalidInput,

    /// URL does not match any supported platform
    #[error("Invalid URL. Supported platforms: {supported}")]
    UnsupportedPlatform {
        /// Comma-separated list of supported platform names
        supported: String,
    },

    /// The video is private or the platform demands a login
    #[error("This video is private or requires login.")]
    PrivateOrLoginRequired,

    /// The video no longer exists
    #[error("Video not found or has been deleted.")]
    NotFoundOrRemoved,

    /// Any other extractor failure
    #[error("Failed to download video. Please check the URL and try again.")]
    GenericDownloadFailure {
        /// Exit code of the extractor, if it exited on its own
        exit_code: Option<i32>,
    },

    /// The extractor ran past its deadline and was killed
    #[error("Failed to download video. Please check the URL and try again.")]
    SubprocessTimeout {
        /// The deadline that was exceeded
        after: Duration,
    },

    /// The extractor reported success but no file for the job exists
    #[error("Download completed but file not found")]
    ArtifactMissing,
}

impl DownloadError {
    /// Short machine-readable name of the failure kind, used in logs and events
    pub fn kind(&self) -> &'static str {
        match self {
            DownloadError::InvalidInput => "invalid_input",
            DownloadError::UnsupportedPlatform { .. } => "unsupported_platform",
            DownloadError::PrivateOrLoginRequired => "private_or_login_required",
            DownloadError::NotFoundOrRemoved => "not_found_or_removed",
            DownloadError::GenericDownloadFailure { .. } => "download_failed",
            DownloadError::SubprocessTimeout { .. } => "subprocess_timeout",
            DownloadError::ArtifactMissing => "artifact_missing",
        }
    }

    /// Whether the failure is the caller's fault (4xx) rather than ours (5xx)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DownloadError::InvalidInput
                | DownloadError::UnsupportedPlatform { .. }
                | DownloadError::PrivateOrLoginRequired
                | DownloadError::NotFoundOrRemoved
        )
    }
}

/// API error response format
///
/// Every failing endpoint answers with a single-field JSON object:
///
/// ```json
/// { "error": "This video is private or requires login." }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Human-readable one-line error message
    pub error: String,
}

impl ApiError {
    /// Create a new API error with the given message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }

    /// Create an "internal server error"
    pub fn internal() -> Self {
        Self::new(INTERNAL_ERROR_MESSAGE)
    }
}

/// Convert errors to HTTP status codes for API responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for DownloadError {
    fn status_code(&self) -> u16 {
        if self.is_client_error() { 400 } else { 500 }
    }

    fn error_code(&self) -> &str {
        self.kind()
    }
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            Error::Download(e) => e.status_code(),

            // 503 Service Unavailable
            Error::ShuttingDown => 503,

            // 500 Internal Server Error - Server-side issues
            Error::Config { .. } => 500,
            Error::Io(_) => 500,
            Error::Serialization(_) => 500,
            Error::ApiServerError(_) => 500,
            Error::ExternalTool(_) => 500,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Download(e) => e.error_code(),
            Error::Config { .. } => "config_error",
            Error::Io(_) => "io_error",
            Error::ShuttingDown => "shutting_down",
            Error::Serialization(_) => "serialization_error",
            Error::ApiServerError(_) => "api_server_error",
            Error::ExternalTool(_) => "external_tool_error",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        match error {
            Error::Download(e) => ApiError::new(e.to_string()),
            Error::ShuttingDown => ApiError::new(error.to_string()),
            // Anything else may carry paths or tool output
            _ => ApiError::internal(),
        }
    }
}
