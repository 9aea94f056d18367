//! Test configuration helpers for creating downloaders around fake tools

use reel_dl::config::ToolsConfig;
use reel_dl::{Config, VideoDownloader};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Tools config that runs `script` through `/bin/sh`
pub fn shell_tools(script: &Path, timeout: Duration) -> ToolsConfig {
    ToolsConfig {
        ytdlp_path: Some(PathBuf::from("/bin/sh")),
        ytdlp_prefix_args: vec![script.display().to_string()],
        invocation_timeout: timeout,
        ..Default::default()
    }
}

/// Config rooted in `dir` whose extractor is `script`
pub fn script_config(dir: &Path, script: &Path) -> Config {
    let mut config = Config::default();
    config.download.output_dir = dir.join("public").join("videos");
    config.server.api.public_dir = dir.join("public");
    config.tools = shell_tools(script, Duration::from_secs(30));
    config
}

/// Downloader whose extractor runs the script `body`.
/// Returns the downloader and the tempdir (which must be kept alive).
pub async fn create_script_downloader(body: &str) -> (Arc<VideoDownloader>, TempDir) {
    let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
    let script = crate::common::write_script(temp_dir.path(), "yt-dlp", body);
    let config = script_config(temp_dir.path(), &script);
    let downloader = VideoDownloader::new(config)
        .await
        .expect("failed to create downloader");
    (Arc::new(downloader), temp_dir)
}
