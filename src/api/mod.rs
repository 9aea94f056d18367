//! REST API server module
//!
//! Exposes the downloader over HTTP, serves downloaded files and the
//! optional web front-end.

use crate::{Result, VideoDownloader};
use axum::{
    Router,
    handler::Handler,
    http::HeaderValue,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod error_response;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use state::AppState;

/// Create the API router with all route definitions
///
/// # Routes
///
/// ## Downloads
/// - `POST /api/download` - Download a video and return its public path
/// - `POST /api/cleanup` - Delete every downloaded file now
///
/// ## System
/// - `GET /api/health` - Health check
/// - `GET /api/openapi.json` - OpenAPI specification
/// - `GET /api/events` - Server-sent events stream
/// - `GET /swagger-ui` - Interactive Swagger UI documentation (if enabled)
///
/// ## Static files
/// - `GET /videos/<file>` - Downloaded files (prefix is `public_prefix`)
/// - anything else - files from `public_dir`, then `index.html`, then an
///   API description
pub fn create_router(downloader: Arc<VideoDownloader>) -> Router {
    let config = downloader.config.clone();
    let state = AppState::new(downloader, config.clone());
    let api = &config.server.api;

    let api_routes = Router::new()
        // Downloads
        .route("/download", post(routes::download_video))
        .route("/cleanup", post(routes::cleanup))
        // System
        .route("/health", get(routes::health_check))
        .route("/openapi.json", get(routes::openapi_spec))
        .route("/events", get(routes::event_stream));

    let router = Router::new().nest("/api", api_routes);

    // Swagger UI serves its own copy of the document so it does not clash with /api/openapi.json
    let router = if api.swagger_ui {
        router.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
    } else {
        router
    };

    let public_prefix = api.public_prefix.trim_end_matches('/');
    let site = ServeDir::new(&api.public_dir)
        .fallback(routes::site_fallback.with_state(state.clone()));

    let router = router
        .nest_service(public_prefix, ServeDir::new(config.output_dir()))
        .fallback_service(site)
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    // Apply CORS middleware if enabled in config
    if api.cors_enabled {
        router.layer(build_cors_layer(&api.cors_origins))
    } else {
        router
    }
}

/// CORS for the configured origins
///
/// `"*"` or an empty list means any origin. Unparseable origins are skipped.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() || origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins.iter().filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        }))
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Start the API server on the configured bind address.
///
/// Runs until `shutdown` resolves. The downloader is shut down first so
/// requests still in flight see `503`, then the server stops accepting
/// connections and waits for open ones to finish.
///
/// # Example
///
/// ```no_run
/// use reel_dl::{VideoDownloader, Config};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let downloader = Arc::new(VideoDownloader::new(Config::default()).await?);
///
/// reel_dl::api::start_api_server(downloader, async {
///     tokio::signal::ctrl_c().await.ok();
/// })
/// .await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_api_server<F>(downloader: Arc<VideoDownloader>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let bind_address = downloader.config.server.api.bind_address;

    tracing::info!(address = %bind_address, "Starting API server");

    let app = create_router(downloader.clone());

    let listener = TcpListener::bind(bind_address)
        .await
        .map_err(crate::error::Error::Io)?;

    tracing::info!(address = %bind_address, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.await;
            downloader.shutdown().await;
        })
        .await
        .map_err(|e| crate::error::Error::ApiServerError(e.to_string()))?;

    tracing::info!("API server stopped");
    Ok(())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
