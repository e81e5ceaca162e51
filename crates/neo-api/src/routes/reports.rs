//! Report catalog endpoints.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use neo_core::{run_report, ReportId, CATALOG};
use neo_observability::report_span;
use tracing::Instrument;

use crate::dto::{ReportResponse, ReportSummary};
use crate::error::ApiError;
use crate::state::AppState;

/// Creates report routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reports))
        .route("/:id", get(get_report))
}

/// List the report catalog.
#[utoipa::path(
    get,
    path = "/api/v1/reports",
    responses(
        (status = 200, description = "All catalog reports, ordered by id", body = Vec<ReportSummary>)
    ),
    tag = "Reports"
)]
pub async fn list_reports() -> Json<Vec<ReportSummary>> {
    Json(CATALOG.iter().map(ReportSummary::from).collect())
}

/// Run one catalog report.
#[utoipa::path(
    get,
    path = "/api/v1/reports/{id}",
    params(
        ("id" = u8, Path, description = "Report number, 1 to 15")
    ),
    responses(
        (status = 200, description = "Report result", body = ReportResponse),
        (status = 404, description = "Unknown report", body = crate::error::ErrorResponse),
        (status = 503, description = "Database unreachable", body = crate::error::ErrorResponse)
    ),
    tag = "Reports"
)]
pub async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ReportResponse>, ApiError> {
    let id: ReportId = id
        .parse()
        .map_err(|_| ApiError::NotFound(format!("Report {} does not exist", id)))?;

    let table = run_report(state.executor.as_ref(), id)
        .instrument(report_span!(id))
        .await?;

    Ok(Json(ReportResponse {
        report: ReportSummary::from(id.descriptor()),
        table: table.into(),
    }))
}
