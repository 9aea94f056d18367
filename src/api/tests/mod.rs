use super::*;
use crate::downloader::test_helpers::{MockBehavior, MockExtractor};
use axum::body::Body;
use axum::extract::Request;
use axum::http::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tower::ServiceExt;


/// Router around a mock extractor, plus everything a test may want to inspect
struct TestApp {
    router: Router,
    downloader: Arc<VideoDownloader>,
    extractor: Arc<MockExtractor>,
    _temp_dir: tempfile::TempDir,
}

async fn create_test_app(extractor: MockExtractor) -> TestApp {
    let extractor = Arc::new(extractor);
    let (downloader, temp_dir) =
        crate::downloader::test_helpers::create_test_downloader(extractor.clone()).await;
    let downloader = Arc::new(downloader);
    TestApp {
        router: create_router(downloader.clone()),
        downloader,
        extractor,
        _temp_dir: temp_dir,
    }
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn send(router: &Router, request: Request) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = body_bytes(response).await;
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

async fn post_json(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(router, request).await
}

async fn get(router: &Router, uri: &str) -> axum::response::Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    router.clone().oneshot(request).await.unwrap()
}

#[tokio::test]
async fn test_api_server_spawns_and_shuts_down() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut config = crate::downloader::test_helpers::test_config(temp_dir.path());
    // Port 0 = OS assigns a free port
    config.server.api.bind_address = "127.0.0.1:0".parse().unwrap();
    let downloader = Arc::new(
        VideoDownloader::with_extractor(config, Arc::new(MockExtractor::producing_mp4()))
            .await
            .unwrap(),
    );

    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let api_handle = tokio::spawn({
        let downloader = downloader.clone();
        async move {
            start_api_server(downloader, async {
                stop_rx.await.ok();
            })
            .await
        }
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    stop_tx.send(()).unwrap();

    let result = tokio::time::timeout(Duration::from_secs(5), api_handle)
        .await
        .expect("server did not stop")
        .unwrap();
    assert!(result.is_ok());
    assert!(!downloader.is_accepting());
}

#[tokio::test]
async fn test_cors_enabled() {
    let app = create_test_app(MockExtractor::producing_mp4()).await;

    let request = Request::builder()
        .uri("/api/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn test_cors_disabled() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut config = crate::downloader::test_helpers::test_config(temp_dir.path());
    config.server.api.cors_enabled = false;
    let downloader = Arc::new(
        VideoDownloader::with_extractor(config, Arc::new(MockExtractor::producing_mp4()))
            .await
            .unwrap(),
    );
    let router = create_router(downloader);

    let request = Request::builder()
        .uri("/api/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .get("access-control-allow-origin")
            .is_none()
    );
}

#[test]
fn test_cors_layer_with_specific_origins() {
    // Invalid header values are skipped rather than panicking
    let _layer = build_cors_layer(&[
        "http://localhost:3000".to_string(),
        "not a header\nvalue".to_string(),
    ]);
}

#[tokio::test]
async fn test_cors_only_echoes_listed_origins() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut config = crate::downloader::test_helpers::test_config(temp_dir.path());
    config.server.api.cors_origins = vec![
        "https://reels.example.com".to_string(),
        "not a header\nvalue".to_string(),
    ];
    let downloader = Arc::new(
        VideoDownloader::with_extractor(config, Arc::new(MockExtractor::producing_mp4()))
            .await
            .unwrap(),
    );
    let router = create_router(downloader);

    for (origin, expected) in [
        ("https://reels.example.com", Some("https://reels.example.com")),
        ("https://evil.example.com", None),
    ] {
        let request = Request::builder()
            .uri("/api/health")
            .header("Origin", origin)
            .body(Body::empty())
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .and_then(|v| v.to_str().ok()),
            expected,
            "origin {origin}"
        );
    }
}

#[tokio::test]
async fn test_swagger_ui_enabled() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut config = crate::downloader::test_helpers::test_config(temp_dir.path());
    config.server.api.swagger_ui = true;
    let downloader = Arc::new(
        VideoDownloader::with_extractor(config, Arc::new(MockExtractor::producing_mp4()))
            .await
            .unwrap(),
    );
    let router = create_router(downloader);

    let response = get(&router, "/api-docs/openapi.json").await;
    assert_eq!(response.status(), StatusCode::OK);

    // The API's own document stays reachable
    let response = get(&router, "/api/openapi.json").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_mock_behaviors_reach_http_layer() {
    let app = create_test_app(MockExtractor::new(MockBehavior::Timeout)).await;

    let (status, body) = post_json(
        &app.router,
        "/api/download",
        serde_json::json!({ "url": "https://www.tiktok.com/@user/video/1" }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "Failed to download video. Please check the URL and try again."
    );
    assert_eq!(app.extractor.calls(), 1);
}
