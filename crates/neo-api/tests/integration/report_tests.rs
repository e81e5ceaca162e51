//! Report catalog integration tests.

use axum::http::StatusCode;
use serde_json::Value;

use super::common::{create_test_router, get_request, send_request, send_request_raw};

/// Every report runs against the real schema and keeps its projection.
#[tokio::test]
async fn test_every_report_runs() {
    let (app, _state) = create_test_router().await;

    let (_, catalog): (StatusCode, Value) =
        send_request(app.clone(), get_request("/api/v1/reports")).await;

    for report in catalog.as_array().unwrap() {
        let id = report["id"].as_u64().unwrap();
        let (status, body): (StatusCode, Value) =
            send_request(app.clone(), get_request(&format!("/api/v1/reports/{}", id))).await;

        assert_eq!(status, StatusCode::OK, "report {}", id);
        assert_eq!(body["table"]["columns"], report["columns"], "report {}", id);
    }
}

/// Report 14 lists only approaches closer than the Moon.
#[tokio::test]
async fn test_closer_than_moon_report() {
    let (app, _state) = create_test_router().await;

    let (status, body): (StatusCode, Value) =
        send_request(app, get_request("/api/v1/reports/14")).await;

    assert_eq!(status, StatusCode::OK);
    let rows = body["table"]["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    // Ordered by lunar distance, closest first.
    assert_eq!(rows[0][0], "(2015 RC)");
    assert_eq!(rows[1][0], "(2010 PK9)");
    assert_eq!(rows[1][1], "2024-01-12");
}

/// The report page renders the selected report as an HTML table.
#[tokio::test]
async fn test_report_page_renders_table() {
    let (app, _state) = create_test_router().await;

    let (status, body) = send_request_raw(app, get_request("/queries?report=7")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<th>estimated_diameter_max_km</th>"));
    assert!(body.contains("433 Eros (A898 PA)"));
}

/// Unknown report ids are 404s on both surfaces.
#[tokio::test]
async fn test_unknown_report_ids() {
    let (app, _state) = create_test_router().await;

    let (status, _) = send_request_raw(app.clone(), get_request("/api/v1/reports/16")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_request_raw(app, get_request("/queries?report=0")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
