//! yt-dlp subprocess extractor

use super::traits::{Extractor, InvocationOutcome};
use crate::config::ToolsConfig;
use crate::types::OutputPathTemplate;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::{debug, warn};

/// How long to keep draining stderr after the process has exited
///
/// A grandchild (ffmpeg) may still hold the pipe open.
const STDERR_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Extractor that runs the external `yt-dlp` binary
///
/// The URL is passed as a discrete argument after a `--` terminator, never
/// through a shell, so it can neither inject commands nor be parsed as an
/// option. Each run is bounded by a hard deadline after which the process is
/// killed and reaped.
///
/// # Examples
///
/// ```no_run
/// use reel_dl::config::ToolsConfig;
/// use reel_dl::extractor::YtDlpExtractor;
/// use std::path::PathBuf;
///
/// // Explicit path
/// let extractor = YtDlpExtractor::new(PathBuf::from("/usr/local/bin/yt-dlp"), &ToolsConfig::default());
///
/// // Or auto-discover from PATH
/// let extractor = YtDlpExtractor::from_path(&ToolsConfig::default())
///     .expect("yt-dlp not found in PATH");
/// ```
#[derive(Debug, Clone)]
pub struct YtDlpExtractor {
    binary_path: PathBuf,
    prefix_args: Vec<String>,
    format: String,
    merge_output_format: String,
    timeout: Duration,
}

impl YtDlpExtractor {
    /// Create an extractor for an explicit binary path
    pub fn new(binary_path: PathBuf, tools: &ToolsConfig) -> Self {
        Self {
            binary_path,
            prefix_args: tools.ytdlp_prefix_args.clone(),
            format: tools.format.clone(),
            merge_output_format: tools.merge_output_format.clone(),
            timeout: tools.invocation_timeout,
        }
    }

    /// Attempt to find yt-dlp in PATH
    ///
    /// Returns `None` if no `yt-dlp` binary is on the PATH.
    pub fn from_path(tools: &ToolsConfig) -> Option<Self> {
        which::which("yt-dlp")
            .ok()
            .map(|path| Self::new(path, tools))
    }

    /// Use `tools.ytdlp_path` if set, otherwise search the PATH
    pub fn from_config(tools: &ToolsConfig) -> Option<Self> {
        match &tools.ytdlp_path {
            Some(path) => Some(Self::new(path.clone(), tools)),
            None => Self::from_path(tools),
        }
    }

    /// Path of the binary this extractor runs
    pub fn binary_path(&self) -> &Path {
        &self.binary_path
    }

    /// Deadline applied to every run
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Argument vector for one run
    pub(crate) fn build_args(&self, url: &str, template: &OutputPathTemplate) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.prefix_args.iter().map(OsString::from).collect();
        args.extend([
            "-f".into(),
            self.format.as_str().into(),
            "--merge-output-format".into(),
            self.merge_output_format.as_str().into(),
            "--no-playlist".into(),
            "--no-warnings".into(),
            "--no-progress".into(),
            "-o".into(),
            template.as_path().as_os_str().to_owned(),
            "--".into(),
            url.into(),
        ]);
        args
    }
}

#[async_trait]
impl Extractor for YtDlpExtractor {
    async fn extract(
        &self,
        url: &str,
        template: &OutputPathTemplate,
    ) -> crate::Result<InvocationOutcome> {
        let started = Instant::now();

        let mut child = Command::new(&self.binary_path)
            .args(self.build_args(url, template))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                crate::Error::ExternalTool(format!(
                    "Failed to execute {}: {}",
                    self.binary_path.display(),
                    e
                ))
            })?;

        debug!(pid = ?child.id(), %template, "yt-dlp started");

        let mut stderr_pipe = child.stderr.take().ok_or_else(|| {
            crate::Error::ExternalTool("Failed to capture stderr from yt-dlp".into())
        })?;
        let stderr_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            if let Err(e) = stderr_pipe.read_to_end(&mut buf).await {
                debug!(error = %e, "stopped reading yt-dlp stderr");
            }
            buf
        });

        match tokio::time::timeout(self.timeout, child.wait()).await {
            Ok(status) => {
                let status = status.map_err(|e| {
                    crate::Error::ExternalTool(format!("Failed to wait for yt-dlp: {}", e))
                })?;
                let error_text = match tokio::time::timeout(STDERR_DRAIN_TIMEOUT, stderr_task).await
                {
                    Ok(Ok(buf)) => String::from_utf8_lossy(&buf).into_owned(),
                    _ => String::new(),
                };
                let elapsed = started.elapsed();

                if status.success() {
                    Ok(InvocationOutcome {
                        error_text,
                        ..InvocationOutcome::success(elapsed)
                    })
                } else {
                    Ok(InvocationOutcome::failure(status.code(), error_text, elapsed))
                }
            }
            Err(_) => {
                warn!(
                    timeout_secs = self.timeout.as_secs_f64(),
                    pid = ?child.id(),
                    "yt-dlp timed out, killing"
                );
                // kill() also reaps the child
                if let Err(e) = child.kill().await {
                    warn!(error = %e, "failed to kill timed-out yt-dlp");
                }
                // Keep what the tool printed before the deadline for the log
                let error_text = match tokio::time::timeout(STDERR_DRAIN_TIMEOUT, stderr_task).await
                {
                    Ok(Ok(buf)) => String::from_utf8_lossy(&buf).into_owned(),
                    _ => String::new(),
                };
                Ok(InvocationOutcome::timeout(error_text, started.elapsed()))
            }
        }
    }

    fn name(&self) -> &'static str {
        "yt-dlp"
    }
}
