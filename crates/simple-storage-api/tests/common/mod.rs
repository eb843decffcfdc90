//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use simple_storage_core::clock::Clock;
use simple_storage_event_store::memory_event_repository::InMemoryEventRepository;
use simple_storage_test_support::FixedClock;
use tower::ServiceExt;

use simple_storage_api::state::AppState;

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock + Send + Sync> {
    Arc::new(FixedClock(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

/// Build the full app router over an in-memory event store and a fixed
/// clock. Same middleware and route layout as the binary.
pub fn build_test_app() -> Router {
    let app_state = AppState::new(fixed_clock(), Arc::new(InMemoryEventRepository::new()));
    simple_storage_api::app(app_state)
}

/// Send a request and return the status and JSON body.
async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Deploy a new storage engine owned by `deployer` and return its ID.
pub async fn deploy(app: Router, deployer: &str) -> String {
    let (status, json) = post_json(
        app,
        "/api/v1/storage",
        &serde_json::json!({ "deployer": deployer }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "deploy failed: {json}");
    json["aggregate_id"].as_str().unwrap().to_owned()
}
