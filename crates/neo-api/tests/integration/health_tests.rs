//! Health check endpoint integration tests.

use axum::http::StatusCode;
use serde_json::Value;

use super::common::{create_test_router, get_request, send_request, send_request_raw};

/// Tests that the basic health endpoint reports the backend.
#[tokio::test]
async fn test_health_endpoint_returns_ok() {
    let (app, _state) = create_test_router().await;

    let (status, body): (StatusCode, Value) = send_request(app, get_request("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"]["backend"], "sqlite");
}

/// Tests that the live endpoint returns success.
#[tokio::test]
async fn test_live_endpoint_returns_ok() {
    let (app, _state) = create_test_router().await;

    let (status, _body) = send_request_raw(app, get_request("/live")).await;

    assert_eq!(status, StatusCode::OK);
}

/// Tests that the ready endpoint returns success when database is connected.
#[tokio::test]
async fn test_ready_endpoint_returns_ok() {
    let (app, _state) = create_test_router().await;

    let (status, _body) = send_request_raw(app, get_request("/ready")).await;

    assert_eq!(status, StatusCode::OK);
}
