//! Approach filter integration tests, including injection attempts.

use axum::http::StatusCode;
use serde_json::Value;

use super::common::{create_test_router, get_request, send_request, send_request_raw};

const JANUARY: &str = "start_date=2024-01-01&end_date=2024-01-31";

/// January 2024 with default bounds returns both January rows, by date.
#[tokio::test]
async fn test_january_filter() {
    let (app, _state) = create_test_router().await;

    let (status, body): (StatusCode, Value) =
        send_request(app, get_request(&format!("/api/v1/approaches?{}", JANUARY))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["matched"], true);
    assert_eq!(body["row_count"], 2);
    let rows = body["table"]["rows"].as_array().unwrap();
    assert_eq!(rows[0][6], "2024-01-03");
    assert_eq!(rows[1][6], "2024-01-12");
}

/// Hazard options split the result.
#[tokio::test]
async fn test_hazard_partition() {
    let (app, _state) = create_test_router().await;

    let count = |hazard: &'static str| {
        let app = app.clone();
        async move {
            let uri = format!("/api/v1/approaches?{}&hazard={}", JANUARY, hazard);
            let (_, body): (StatusCode, Value) = send_request(app, get_request(&uri)).await;
            body["row_count"].as_u64().unwrap()
        }
    };

    let all = count("all").await;
    let hazardous = count("hazardous").await;
    let harmless = count("non-hazardous").await;

    assert_eq!(hazardous, 1);
    assert_eq!(harmless, 1);
    assert_eq!(hazardous + harmless, all);
}

/// An inverted date range is an empty result, not an error.
#[tokio::test]
async fn test_inverted_dates_match_nothing() {
    let (app, _state) = create_test_router().await;

    let (status, body): (StatusCode, Value) = send_request(
        app,
        get_request("/api/v1/approaches?start_date=2025-12-31&end_date=2024-01-01"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["matched"], false);
    assert_eq!(body["row_count"], 0);
}

/// The filter page shows the no-match notice.
#[tokio::test]
async fn test_filter_page_no_matches() {
    let (app, _state) = create_test_router().await;

    let (status, body) = send_request_raw(
        app,
        get_request("/filter?submit=1&start_date=2030-01-01&end_date=2030-12-31"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("No asteroids match your filter criteria."));
}

/// Crafted values are rejected and the dataset is unchanged afterwards.
#[tokio::test]
async fn test_injection_attempts_are_rejected() {
    let (app, _state) = create_test_router().await;

    let attempts = [
        "start_date=2024-01-01%27%20OR%20%271%27%3D%271",
        "end_date=2024-12-31%3B%20DROP%20TABLE%20close_approach%3B%20--",
        "velocity_max=150000%20OR%201%3D1",
        "ld_min=0)%3B%20DELETE%20FROM%20asteroids%3B%20--",
        "hazard=all%27%20OR%201%3D1%20--",
    ];

    for attempt in attempts {
        let (status, body): (StatusCode, Value) = send_request(
            app.clone(),
            get_request(&format!("/api/v1/approaches?{}", attempt)),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", attempt);
        assert_eq!(body["code"], "VALIDATION_ERROR");

        let (status, _) = send_request_raw(
            app.clone(),
            get_request(&format!("/filter?submit=1&{}", attempt)),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", attempt);
    }

    let (_, body): (StatusCode, Value) = send_request(
        app,
        get_request("/api/v1/approaches?start_date=2000-01-01&end_date=2100-01-01&diameter_max=100&au_max=5&ld_max=1000"),
    )
    .await;
    assert_eq!(body["row_count"], 5);
}
