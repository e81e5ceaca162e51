//! Application state shared across handlers.

use neo_core::db::{create_query_executor, DbPool, QueryExecutor};
use std::sync::Arc;
use tracing::info;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DbPool>,
    /// Executes report and filter statements.
    pub executor: Arc<dyn QueryExecutor>,
}

impl AppState {
    /// Creates a new application state backed by `db`.
    pub fn new(db: DbPool) -> Self {
        let executor: Arc<dyn QueryExecutor> = Arc::from(create_query_executor(&db));
        info!(backend = db.db_type(), "Query executor initialized");

        Self {
            db: Arc::new(db),
            executor,
        }
    }

    /// Replaces the query executor, e.g. with a mock in tests.
    pub fn with_executor(mut self, executor: Arc<dyn QueryExecutor>) -> Self {
        self.executor = executor;
        self
    }
}
