use super::*;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use serde_json::Value;
use std::time::Duration;
use tower::ServiceExt;


/// Helper to create a test FileArchiver instance wrapped in Arc
async fn create_test_archiver() -> (Arc<FileArchiver>, tempfile::TempDir) {
    let (archiver, temp_dir) = crate::archiver::test_helpers::create_test_archiver().await;
    (Arc::new(archiver), temp_dir)
}

/// Router over a fresh archiver using its own config
async fn create_test_app() -> (Router, Arc<FileArchiver>, tempfile::TempDir) {
    let (archiver, temp_dir) = create_test_archiver().await;
    let config = archiver.config().clone();
    (create_router(archiver.clone(), config), archiver, temp_dir)
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_api_server_spawns_and_stops_on_cancel() {
    let (archiver, _temp_dir) = create_test_archiver().await;

    let mut config = (**archiver.config()).clone();
    config.api.host = "127.0.0.1".parse().unwrap();
    config.api.port = 0; // Port 0 = OS assigns a free port
    config.api.shutdown_grace = Duration::from_millis(200);
    let config = Arc::new(config);

    let shutdown = CancellationToken::new();
    let api_handle = tokio::spawn({
        let archiver = archiver.clone();
        let config = config.clone();
        let shutdown = shutdown.clone();
        async move { start_api_server(archiver, config, shutdown).await }
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    shutdown.cancel();

    let result = tokio::time::timeout(Duration::from_secs(2), api_handle)
        .await
        .expect("server should stop within the grace period")
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_cors_enabled() {
    let (archiver, _temp_dir) = create_test_archiver().await;

    let mut config = (**archiver.config()).clone();
    config.api.cors_enabled = true;
    config.api.cors_origins = vec!["*".to_string()];
    let app = create_router(archiver, Arc::new(config));

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .contains_key("access-control-allow-origin"),
        "CORS header should be present when CORS is enabled"
    );
}

#[tokio::test]
async fn test_cors_origin_list_only_allows_listed_origins() {
    let (archiver, _temp_dir) = create_test_archiver().await;

    let mut config = (**archiver.config()).clone();
    config.api.cors_enabled = true;
    config.api.cors_origins = vec![
        "https://app.example.com".to_string(),
        "bad\norigin".to_string(),
    ];
    let app = create_router(archiver, Arc::new(config));

    let request = |origin: &str| {
        Request::builder()
            .uri("/health")
            .header("Origin", origin)
            .body(Body::empty())
            .unwrap()
    };

    let response = app
        .clone()
        .oneshot(request("https://app.example.com"))
        .await
        .unwrap();
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "https://app.example.com"
    );

    let response = app.oneshot(request("https://other.example.com")).await.unwrap();
    assert!(
        !response
            .headers()
            .contains_key("access-control-allow-origin")
    );
}

#[tokio::test]
async fn test_cors_disabled() {
    let (archiver, _temp_dir) = create_test_archiver().await;

    let mut config = (**archiver.config()).clone();
    config.api.cors_enabled = false;
    let app = create_router(archiver, Arc::new(config));

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert!(
        !response
            .headers()
            .contains_key("access-control-allow-origin")
    );
}

#[tokio::test]
async fn test_swagger_ui_toggle() {
    let (archiver, _temp_dir) = create_test_archiver().await;

    let mut config = (**archiver.config()).clone();
    config.api.swagger_ui = false;
    let app = create_router(archiver.clone(), Arc::new(config));
    let response = send(&app, get_request("/api-docs/openapi.json")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let config = archiver.config().clone();
    let app = create_router(archiver, config);
    let response = send(&app, get_request("/api-docs/openapi.json")).await;
    assert_eq!(response.status(), StatusCode::OK);
}
