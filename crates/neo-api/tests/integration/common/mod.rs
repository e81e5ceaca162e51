//! Common test utilities for integration tests.

use axum::{
    body::Body,
    http::{Method, StatusCode},
    Router,
};
use chrono::NaiveDate;
use neo_api::{ApiServer, ApiServerConfig, AppState};
use neo_core::db::{insert_records, run_migrations, DbPool};
use neo_core::{Asteroid, CloseApproach};
use serde::de::DeserializeOwned;
use sqlx::SqlitePool;
use tower::ServiceExt;
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn asteroid(id: i64, name: &str, min_km: f64, max_km: f64, hazardous: bool) -> Asteroid {
    Asteroid {
        asteroid_id: id,
        name: name.to_string(),
        absolute_magnitude_h: 20.0,
        estimated_diameter_min_km: min_km,
        estimated_diameter_max_km: max_km,
        is_potentially_hazardous_asteroid: hazardous,
    }
}

/// Three asteroids and five approaches; two approaches are in January 2024.
pub async fn seed(db: &DbPool) {
    let asteroids = vec![
        asteroid(3542519, "(2010 PK9)", 0.12, 0.27, true),
        asteroid(2000433, "433 Eros (A898 PA)", 22.1, 49.4, false),
        asteroid(3726710, "(2015 RC)", 0.03, 0.07, false),
    ];
    let approaches = vec![
        CloseApproach::from_km(3542519, date(2024, 1, 12), 48_000.0, 314_159.0),
        CloseApproach::from_km(3726710, date(2024, 1, 3), 22_000.0, 2_500_000.0),
        CloseApproach::from_km(3542519, date(2024, 8, 30), 61_000.0, 4_000_000.0),
        CloseApproach::from_km(2000433, date(2025, 1, 31), 21_000.0, 59_000_000.0),
        CloseApproach::from_km(3726710, date(2025, 6, 1), 18_000.0, 120_000.0),
    ];
    insert_records(db, &asteroids, &approaches)
        .await
        .expect("Failed to seed dataset");
}

/// Creates an in-memory SQLite database with migrations applied and the
/// dataset loaded.
pub async fn setup_test_db() -> SqlitePool {
    let db_url = format!(
        "sqlite:file:integration_test_{}?mode=memory&cache=shared",
        Uuid::new_v4()
    );

    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&db_url)
        .await
        .expect("Failed to create SQLite pool");

    let db = DbPool::Sqlite(pool.clone());
    run_migrations(&db).await.expect("Failed to run migrations");
    seed(&db).await;
    pool
}

/// Creates an AppState with test database.
pub async fn create_test_state() -> AppState {
    AppState::new(DbPool::Sqlite(setup_test_db().await))
}

/// Creates the full router with Swagger UI disabled.
pub async fn create_test_router() -> (Router, AppState) {
    let state = create_test_state().await;
    let config = ApiServerConfig {
        enable_swagger: false,
        ..Default::default()
    };
    let router = ApiServer::new(state.clone(), config).router();
    (router, state)
}

/// Helper to make GET requests.
pub fn get_request(uri: &str) -> axum::extract::Request<Body> {
    axum::extract::Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Sends request and parses JSON response.
pub async fn send_request<T: DeserializeOwned>(
    app: Router,
    request: axum::extract::Request<Body>,
) -> (StatusCode, T) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let parsed: T = serde_json::from_slice(&body).unwrap_or_else(|e| {
        panic!(
            "Failed to parse response: {} - Body: {:?}",
            e,
            String::from_utf8_lossy(&body)
        )
    });
    (status, parsed)
}

/// Sends request and returns raw response body.
pub async fn send_request_raw(
    app: Router,
    request: axum::extract::Request<Body>,
) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8_lossy(&body).to_string())
}
