//! Configuration types for reel-dl

use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, path::PathBuf, time::Duration};
use utoipa::ToSchema;

/// Download behavior configuration (output directory, retention, concurrency)
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct DownloadConfig {
    /// Shared directory the extractor writes into (default: "./public/videos")
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// How long an artifact stays on disk after it was resolved (default: 600 seconds)
    #[serde(
        default = "default_retention",
        rename = "retention_seconds",
        with = "duration_serde"
    )]
    #[schema(value_type = u64)]
    pub retention: Duration,

    /// Maximum extractor processes running at once (default: 4)
    ///
    /// Requests beyond this limit wait for a slot instead of failing.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_downloads: usize,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            retention: default_retention(),
            max_concurrent_downloads: default_max_concurrent(),
        }
    }
}

/// External extraction tool (yt-dlp) settings
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ToolsConfig {
    /// Path to the yt-dlp executable (auto-detected on PATH if None)
    #[serde(default)]
    pub ytdlp_path: Option<PathBuf>,

    /// Arguments placed before the tool arguments
    ///
    /// Lets yt-dlp run through an interpreter, e.g. `ytdlp_path = "python3"`
    /// with `ytdlp_prefix_args = ["-m", "yt_dlp"]`.
    #[serde(default)]
    pub ytdlp_prefix_args: Vec<String>,

    /// Hard wall-clock limit for one extractor run (default: 180 seconds)
    #[serde(
        default = "default_invocation_timeout",
        rename = "invocation_timeout_seconds",
        with = "duration_serde"
    )]
    #[schema(value_type = u64)]
    pub invocation_timeout: Duration,

    /// yt-dlp format selector
    #[serde(default = "default_format")]
    pub format: String,

    /// Container used when separate video and audio streams are merged (default: "mp4")
    #[serde(default = "default_merge_output_format")]
    pub merge_output_format: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ytdlp_path: None,
            ytdlp_prefix_args: Vec::new(),
            invocation_timeout: default_invocation_timeout(),
            format: default_format(),
            merge_output_format: default_merge_output_format(),
        }
    }
}

/// Phrases used to classify extractor failures
///
/// Matched case-insensitively against the extractor's stderr. These follow
/// yt-dlp's wording and may need updating when the tool changes its messages.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ClassificationConfig {
    /// Phrases meaning the video is private or needs a login
    #[serde(default = "default_private_patterns")]
    pub private_patterns: Vec<String>,

    /// Phrases meaning the video no longer exists
    #[serde(default = "default_not_found_patterns")]
    pub not_found_patterns: Vec<String>,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            private_patterns: default_private_patterns(),
            not_found_patterns: default_not_found_patterns(),
        }
    }
}

/// A supported platform and the URL substrings that identify it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PlatformConfig {
    /// Display name used in the "unsupported platform" message
    pub name: String,

    /// Domain substrings; a URL containing any of them is accepted
    pub domains: Vec<String>,
}

impl PlatformConfig {
    fn new(name: &str, domains: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            domains: domains.iter().map(|d| d.to_string()).collect(),
        }
    }
}

/// Main configuration for VideoDownloader
///
/// Fields are organized into logical sub-configs:
/// - [`download`](DownloadConfig) - output directory, retention, concurrency
/// - [`tools`](ToolsConfig) - extractor binary and invocation settings
/// - [`classification`](ClassificationConfig) - failure phrases
/// - [`platforms`](PlatformConfig) - URL allow-list
/// - [`server`](ServerIntegrationConfig) - HTTP API
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Config {
    /// Download behavior settings
    #[serde(default)]
    pub download: DownloadConfig,

    /// Extraction tool settings
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Failure classification phrases
    #[serde(default)]
    pub classification: ClassificationConfig,

    /// Supported platforms
    #[serde(default = "default_platforms")]
    pub platforms: Vec<PlatformConfig>,

    /// API and HTTP server settings
    #[serde(default)]
    pub server: ServerIntegrationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            download: DownloadConfig::default(),
            tools: ToolsConfig::default(),
            classification: ClassificationConfig::default(),
            platforms: default_platforms(),
            server: ServerIntegrationConfig::default(),
        }
    }
}

impl Config {
    /// Output directory
    pub fn output_dir(&self) -> &PathBuf {
        &self.download.output_dir
    }

    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check settings that serde cannot express
    pub fn validate(&self) -> crate::Result<()> {
        if self.download.max_concurrent_downloads == 0 {
            return Err(crate::Error::Config {
                message: "max_concurrent_downloads must be at least 1".into(),
                key: Some("max_concurrent_downloads".into()),
            });
        }
        if self.tools.invocation_timeout.is_zero() {
            return Err(crate::Error::Config {
                message: "invocation_timeout_seconds must be at least 1".into(),
                key: Some("invocation_timeout_seconds".into()),
            });
        }
        let prefix = self.server.api.public_prefix.trim_end_matches('/');
        if !prefix.starts_with('/') || prefix.len() < 2 {
            return Err(crate::Error::Config {
                message: "public_prefix must be a path like \"/videos\"".into(),
                key: Some("public_prefix".into()),
            });
        }
        if self.platforms.iter().all(|p| p.domains.is_empty()) {
            return Err(crate::Error::Config {
                message: "at least one platform domain must be configured".into(),
                key: Some("platforms".into()),
            });
        }
        Ok(())
    }
}

/// API and external server integration
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ServerIntegrationConfig {
    /// REST API configuration
    #[serde(default)]
    pub api: ApiConfig,
}

/// REST API configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiConfig {
    /// Address to bind to (default: 0.0.0.0:5000)
    #[serde(default = "default_bind_address")]
    #[schema(value_type = String)]
    pub bind_address: SocketAddr,

    /// Enable CORS for browser access (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Directory holding the web front-end build (default: "./public")
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,

    /// URL prefix under which artifacts are served (default: "/videos")
    #[serde(default = "default_public_prefix")]
    pub public_prefix: String,

    /// Enable Swagger UI at /swagger-ui (default: false)
    #[serde(default)]
    pub swagger_ui: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_enabled: true,
            cors_origins: default_cors_origins(),
            public_dir: default_public_dir(),
            public_prefix: default_public_prefix(),
            swagger_ui: false,
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./public/videos")
}

fn default_retention() -> Duration {
    Duration::from_secs(10 * 60)
}

fn default_max_concurrent() -> usize {
    4
}

fn default_invocation_timeout() -> Duration {
    Duration::from_secs(180)
}

fn default_format() -> String {
    "best[ext=mp4]/bestvideo[ext=mp4]+bestaudio[ext=m4a]/best".into()
}

fn default_merge_output_format() -> String {
    "mp4".into()
}

fn default_private_patterns() -> Vec<String> {
    vec!["Private video".into(), "login required".into()]
}

fn default_not_found_patterns() -> Vec<String> {
    vec!["Video unavailable".into()]
}

fn default_platforms() -> Vec<PlatformConfig> {
    vec![
        PlatformConfig::new("Instagram", &["instagram.com"]),
        PlatformConfig::new("Facebook", &["facebook.com", "fb.watch", "fb.com"]),
        PlatformConfig::new("YouTube", &["youtube.com", "youtu.be"]),
        PlatformConfig::new("TikTok", &["tiktok.com"]),
    ]
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 5000))
}

fn default_true() -> bool {
    true
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".into()]
}

fn default_public_dir() -> PathBuf {
    PathBuf::from("./public")
}

fn default_public_prefix() -> String {
    "/videos".into()
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
