//! reel-dl HTTP server
//!
//! Configuration is read from the JSON file named by `REEL_DL_CONFIG` (all
//! fields optional); `PORT` overrides the bind port. Log filtering follows
//! `RUST_LOG`.
//!
//! Endpoints:
//! - `POST /api/download` with `{"url": "..."}`
//! - `POST /api/cleanup`
//! - `GET /api/health`
//! - `GET /api/events` (server-sent events)
//! - `GET /videos/<file>`

use reel_dl::{Config, VideoDownloader, run_with_shutdown};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "reel_dl=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_target(true)
        .init();

    let config = load_config().await?;
    tracing::info!(
        bind_address = %config.server.api.bind_address,
        output_dir = %config.output_dir().display(),
        retention_secs = config.download.retention.as_secs(),
        "starting reel-dl"
    );

    let downloader = VideoDownloader::new(config).await?;
    run_with_shutdown(downloader).await?;

    Ok(())
}

async fn load_config() -> reel_dl::Result<Config> {
    let mut config = match std::env::var_os("REEL_DL_CONFIG") {
        Some(path) => {
            let json = tokio::fs::read_to_string(&path).await?;
            Config::from_json(&json)?
        }
        None => Config::default(),
    };

    if let Ok(port) = std::env::var("PORT") {
        let port: u16 = port.parse().map_err(|_| reel_dl::Error::Config {
            message: format!("PORT must be a port number, got {:?}", port),
            key: Some("PORT".into()),
        })?;
        config.server.api.bind_address.set_port(port);
    }

    Ok(config)
}
