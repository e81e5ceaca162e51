//! JSON API and health routes.

pub mod approaches;
pub mod health;
pub mod reports;

use crate::state::AppState;
use axum::Router;

/// Creates the main API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", api_routes())
        .merge(health::routes())
        .with_state(state)
}

/// API routes under the /api/v1 prefix.
fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/reports", reports::routes())
        .nest("/approaches", approaches::routes())
}
