//! Database integration tests using testcontainers.
//!
//! These run the report catalog and the approach filter against a real
//! MySQL server in Docker, covering the column decoding and the
//! MySQL-specific report SQL that the SQLite tests never reach.

use axum::http::StatusCode;
use chrono::NaiveDate;
use neo_api::{ApiServer, ApiServerConfig, AppState};
use neo_core::db::{create_query_executor, QueryExecutor};
use neo_core::{
    run_report, search_approaches, ApproachFilter, CellValue, FilterOutcome, HazardOption,
    ReportId, ResultTable, CATALOG,
};
use serde_json::Value;
use serial_test::serial;
use std::collections::HashSet;

use super::common::{get_request, seed, send_request};
use super::testcontainers_support::{create_mysql_pool, start_mysql};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn everything() -> ApproachFilter {
    ApproachFilter {
        start_date: date(2000, 1, 1),
        end_date: date(2100, 12, 31),
        velocity_min: 0.0,
        velocity_max: 150_000.0,
        diameter_min: 0.0,
        diameter_max: 100.0,
        au_min: 0.0,
        au_max: 5.0,
        ld_min: 0.0,
        ld_max: 1_000.0,
        hazard: HazardOption::All,
    }
}

async fn search(executor: &dyn QueryExecutor, filter: &ApproachFilter) -> ResultTable {
    search_approaches(executor, filter)
        .await
        .expect("filter should execute on MySQL")
        .into_table()
}

fn row_keys(table: &ResultTable) -> HashSet<(i64, NaiveDate)> {
    let id = table.column_index("asteroid_id").expect("asteroid_id column");
    let day = table
        .column_index("close_approach_date")
        .expect("close_approach_date column");
    table
        .rows
        .iter()
        .map(|row| {
            (
                row[id].as_i64().expect("integer id"),
                row[day].as_date().expect("date"),
            )
        })
        .collect()
}

/// Every catalog report runs on MySQL and decodes into typed cells.
#[tokio::test]
#[serial]
#[ignore = "requires Docker"]
async fn test_reports_on_mysql() {
    let mysql = start_mysql().await;
    let db = create_mysql_pool(&mysql).await;
    seed(&db).await;
    let executor = create_query_executor(&db);

    for descriptor in CATALOG.iter() {
        let table = run_report(executor.as_ref(), descriptor.id)
            .await
            .unwrap_or_else(|e| panic!("report {} failed: {}", descriptor.id, e));
        assert_eq!(table.columns, descriptor.columns, "report {}", descriptor.id);
    }

    let busiest = run_report(executor.as_ref(), ReportId::new(5).unwrap())
        .await
        .unwrap();
    assert_eq!(
        busiest.rows,
        vec![vec![CellValue::Text("2024-01".into()), CellValue::Int(2)]]
    );

    let fastest = run_report(executor.as_ref(), ReportId::new(2).unwrap())
        .await
        .unwrap();
    assert_eq!(fastest.rows[0][0].as_i64(), Some(3542519));
    assert_eq!(fastest.rows[0][1], CellValue::Float(54_500.0));

    let hazard_counts = run_report(executor.as_ref(), ReportId::new(13).unwrap())
        .await
        .unwrap();
    let counts: Vec<(Option<bool>, Option<i64>)> = hazard_counts
        .rows
        .iter()
        .map(|row| (row[0].as_bool(), row[1].as_i64()))
        .collect();
    assert_eq!(counts, vec![(Some(false), Some(2)), (Some(true), Some(1))]);

    db.close().await;
}

/// The filter keeps its properties on MySQL: the January scenario, the
/// hazard partition, inverted ranges and the lunar bound.
#[tokio::test]
#[serial]
#[ignore = "requires Docker"]
async fn test_filter_on_mysql() {
    let mysql = start_mysql().await;
    let db = create_mysql_pool(&mysql).await;
    seed(&db).await;
    let executor = create_query_executor(&db);
    let executor = executor.as_ref();

    let january = ApproachFilter {
        start_date: date(2024, 1, 1),
        end_date: date(2024, 1, 31),
        ..everything()
    };
    let january_rows = row_keys(&search(executor, &january).await);
    assert_eq!(
        january_rows,
        HashSet::from([(3542519, date(2024, 1, 12)), (3726710, date(2024, 1, 3))])
    );

    let with = |hazard| ApproachFilter { hazard, ..everything() };
    let all = row_keys(&search(executor, &with(HazardOption::All)).await);
    let hazardous = row_keys(&search(executor, &with(HazardOption::HazardousOnly)).await);
    let harmless = row_keys(&search(executor, &with(HazardOption::NonHazardousOnly)).await);
    assert_eq!(all.len(), 5);
    assert!(hazardous.is_disjoint(&harmless));
    let union: HashSet<_> = hazardous.union(&harmless).copied().collect();
    assert_eq!(union, all);
    assert!(hazardous.iter().all(|(id, _)| *id == 3542519));

    let inverted = ApproachFilter {
        start_date: date(2024, 12, 31),
        end_date: date(2024, 1, 1),
        ..everything()
    };
    let outcome = search_approaches(executor, &inverted).await.unwrap();
    assert!(matches!(outcome, FilterOutcome::NoMatches));

    let within_moon = search(executor, &ApproachFilter { ld_max: 1.0, ..everything() }).await;
    let moon = run_report(executor, ReportId::new(14).unwrap())
        .await
        .unwrap();
    assert_eq!(within_moon.len(), moon.len());
    assert!(within_moon
        .column("miss_distance_lunar")
        .filter_map(CellValue::as_f64)
        .all(|ld| ld <= 1.0));

    db.close().await;
}

/// The full router serves from MySQL and reports the backend.
#[tokio::test]
#[serial]
#[ignore = "requires Docker"]
async fn test_router_on_mysql() {
    let mysql = start_mysql().await;
    let db = create_mysql_pool(&mysql).await;
    seed(&db).await;

    let config = ApiServerConfig {
        enable_swagger: false,
        ..Default::default()
    };
    let app = ApiServer::new(AppState::new(db), config).router();

    let (status, health): (StatusCode, Value) =
        send_request(app.clone(), get_request("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["database"]["backend"], "mysql");

    let (status, body): (StatusCode, Value) = send_request(
        app,
        get_request("/api/v1/approaches?start_date=2024-01-01&end_date=2024-01-31&ld_max=1000"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["row_count"], 2);
}
