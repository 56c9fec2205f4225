//! Request helpers and waits for integration tests

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tower::ServiceExt;

/// Send a request and return status plus raw body bytes
pub async fn call(app: &axum::Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("router is infallible");
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    (status, body.to_vec())
}

/// Send a request and parse the body as JSON
pub async fn call_json(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = call(app, request).await;
    let value = serde_json::from_slice(&body).expect("body should be JSON");
    (status, value)
}

/// POST a JSON body
pub fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

/// Plain GET
pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("valid request")
}

/// Poll `GET /tasks/{id}` until the task is `done` or `error`
///
/// Returns `None` on timeout.
pub async fn wait_for_terminal(app: &axum::Router, id: &str, timeout: Duration) -> Option<Value> {
    let result = tokio::time::timeout(timeout, async {
        loop {
            let (status, task) = call_json(app, get(&format!("/tasks/{id}"))).await;
            assert_eq!(status, StatusCode::OK);
            if matches!(task["status"].as_str(), Some("done") | Some("error")) {
                return task;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await;

    result.ok()
}
