//! Close-approach filter endpoint.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use neo_core::search_approaches;
use neo_observability::filter_span;
use tracing::Instrument;

use crate::dto::{ApproachesResponse, FilterQuery};
use crate::error::ApiError;
use crate::state::AppState;

/// Creates approach filter routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(filter_approaches))
}

/// Filter close approaches.
///
/// Missing criteria take the dashboard defaults. An empty match is a
/// successful response with `matched = false`.
#[utoipa::path(
    get,
    path = "/api/v1/approaches",
    params(FilterQuery),
    responses(
        (status = 200, description = "Matching approaches ordered by date", body = ApproachesResponse),
        (status = 422, description = "Invalid criteria", body = crate::error::ErrorResponse),
        (status = 503, description = "Database unreachable", body = crate::error::ErrorResponse)
    ),
    tag = "Approaches"
)]
pub async fn filter_approaches(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<ApproachesResponse>, ApiError> {
    let criteria = query.to_filter()?;

    let outcome = search_approaches(state.executor.as_ref(), &criteria)
        .instrument(filter_span!(criteria.hazard))
        .await?;

    Ok(Json(ApproachesResponse {
        matched: outcome.is_match(),
        row_count: outcome.row_count(),
        criteria,
        table: outcome.into_table().into(),
    }))
}
