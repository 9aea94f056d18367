//! OpenAPI documentation and schema generation
//!
//! This module defines the OpenAPI specification for the reel-dl REST API
//! using utoipa for compile-time spec generation.

use utoipa::OpenApi;

/// OpenAPI documentation for the reel-dl REST API
///
/// The document can be accessed via:
/// - `/api/openapi.json` - JSON format OpenAPI specification
/// - `/swagger-ui` - Interactive Swagger UI documentation (if enabled)
#[derive(OpenApi)]
#[openapi(
    info(
        title = "reel-dl REST API",
        version = "0.1.0",
        description = "Download short-form social media videos and serve them for a limited time",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server")
    ),
    paths(
        // Downloads
        crate::api::routes::download_video,
        crate::api::routes::cleanup,

        // System
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
        crate::api::routes::event_stream,
    ),
    components(schemas(
        // Core types from types.rs
        crate::types::JobId,
        crate::types::Artifact,
        crate::types::Event,
        crate::types::DownloadRequest,
        crate::types::DownloadResponse,
        crate::types::CleanupResponse,
        crate::types::HealthResponse,

        // Config types from config.rs
        crate::config::Config,
        crate::config::DownloadConfig,
        crate::config::ToolsConfig,
        crate::config::ClassificationConfig,
        crate::config::PlatformConfig,
        crate::config::ServerIntegrationConfig,
        crate::config::ApiConfig,

        // Error types from error.rs
        crate::error::ApiError,
    )),
    tags(
        (name = "downloads", description = "Download videos and clear the download directory"),
        (name = "system", description = "System endpoints - Health checks, OpenAPI spec, events"),
    )
)]
pub struct ApiDoc;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_has_all_paths() {
        let spec = ApiDoc::openapi();

        for path in [
            "/api/download",
            "/api/cleanup",
            "/api/health",
            "/api/openapi.json",
            "/api/events",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing path {path}");
        }
    }

    #[test]
    fn test_openapi_spec_has_components() {
        let components = ApiDoc::openapi().components.unwrap();
        for schema in ["DownloadRequest", "DownloadResponse", "ApiError", "Event"] {
            assert!(
                components.schemas.contains_key(schema),
                "missing schema {schema}"
            );
        }
    }

    #[test]
    fn test_openapi_spec_info() {
        let spec = ApiDoc::openapi();
        assert_eq!(spec.info.title, "reel-dl REST API");
        assert!(spec.info.description.is_some());

        let tag_names: Vec<String> = spec.tags.unwrap().into_iter().map(|t| t.name).collect();
        assert_eq!(tag_names, vec!["downloads", "system"]);
    }

    #[test]
    fn test_openapi_spec_version() {
        let json = serde_json::to_value(ApiDoc::openapi()).expect("Should serialize to JSON");
        let version = json.get("openapi").and_then(|v| v.as_str());
        assert!(
            version.unwrap().starts_with("3."),
            "Should use OpenAPI 3.x version"
        );
    }
}
