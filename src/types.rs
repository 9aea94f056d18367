//! Core types for reel-dl

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use utoipa::ToSchema;

/// Prefix shared by every artifact file name
pub const FILE_PREFIX: &str = "video_";

/// Placeholder yt-dlp substitutes with the extension it picked
pub const EXT_PLACEHOLDER: &str = "%(ext)s";

/// Identifier of one download job
///
/// Combines the millisecond wall-clock time the job started with a short
/// random token. Two jobs started in the same millisecond still differ by
/// their token.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct JobId {
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    /// Lowercase alphanumeric token
    pub random_suffix: String,
}

impl JobId {
    /// Create a JobId from its parts
    pub fn new(timestamp: i64, random_suffix: impl Into<String>) -> Self {
        Self {
            timestamp,
            random_suffix: random_suffix.into(),
        }
    }

    /// File name stem every file of this job starts with: `video_<timestamp>_<suffix>`
    pub fn file_stem(&self) -> String {
        format!("{FILE_PREFIX}{self}")
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.timestamp, self.random_suffix)
    }
}

/// Output path handed to the extractor
///
/// Has the form `<output_dir>/video_<timestamp>_<suffix>.%(ext)s`; the
/// extractor replaces the placeholder with the extension it chose.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OutputPathTemplate(PathBuf);

impl OutputPathTemplate {
    /// Build the template for a job inside `output_dir`
    pub fn for_job(output_dir: &Path, job_id: &JobId) -> Self {
        Self(output_dir.join(format!("{}.{}", job_id.file_stem(), EXT_PLACEHOLDER)))
    }

    /// The template as a path
    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl std::fmt::Display for OutputPathTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// A downloaded video file discovered in the output directory
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Artifact {
    /// Full path on disk
    #[schema(value_type = String)]
    pub path: PathBuf,
    /// File name including the extension the extractor chose
    pub file_name: String,
    /// Size in bytes at the time it was resolved
    pub size_bytes: u64,
    /// Job that produced this file
    pub job_id: JobId,
}

/// Events emitted by the downloader
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A job passed validation and its extractor is about to run
    JobStarted {
        /// Job ID
        job_id: JobId,
        /// Requested URL
        url: String,
    },

    /// A job produced an artifact
    JobCompleted {
        /// Job ID
        job_id: JobId,
        /// Artifact file name
        file_name: String,
        /// Artifact size in bytes
        size_bytes: u64,
    },

    /// A job failed after validation
    JobFailed {
        /// Job ID
        job_id: JobId,
        /// Failure kind (see [`crate::DownloadError::kind`])
        kind: String,
    },

    /// An artifact was deleted because its retention window ran out
    ArtifactEvicted {
        /// Artifact file name
        file_name: String,
    },

    /// The output directory was purged on demand
    Purged {
        /// Number of files deleted
        deleted: usize,
    },

    /// Downloader is shutting down
    Shutdown,
}

impl Event {
    /// Name used for the SSE `event:` field
    pub fn name(&self) -> &'static str {
        match self {
            Event::JobStarted { .. } => "job_started",
            Event::JobCompleted { .. } => "job_completed",
            Event::JobFailed { .. } => "job_failed",
            Event::ArtifactEvicted { .. } => "artifact_evicted",
            Event::Purged { .. } => "purged",
            Event::Shutdown => "shutdown",
        }
    }
}

/// Request body of `POST /api/download`
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct DownloadRequest {
    /// Video page URL
    #[serde(default)]
    pub url: Option<String>,
}

/// Response body of a successful `POST /api/download`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct DownloadResponse {
    /// Always true
    pub success: bool,
    /// Public URL path of the file, e.g. `/videos/video_1700000000000_ab12cd34.mp4`
    pub file: String,
    /// File name
    pub filename: String,
    /// File size in bytes
    pub size: u64,
}

impl DownloadResponse {
    /// Describe an artifact as served under `public_prefix`
    pub fn from_artifact(artifact: &Artifact, public_prefix: &str) -> Self {
        Self {
            success: true,
            file: format!(
                "{}/{}",
                public_prefix.trim_end_matches('/'),
                artifact.file_name
            ),
            filename: artifact.file_name.clone(),
            size: artifact.size_bytes,
        }
    }
}

/// Response body of `POST /api/cleanup`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct CleanupResponse {
    /// `Deleted <n> files`
    pub message: String,
}

impl CleanupResponse {
    /// Build the response for `deleted` files
    pub fn new(deleted: usize) -> Self {
        Self {
            message: format!("Deleted {deleted} files"),
        }
    }
}

/// Response body of `GET /api/health`
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always "ok"
    pub status: String,
    /// Current time, ISO 8601 with millisecond precision
    pub timestamp: String,
}
