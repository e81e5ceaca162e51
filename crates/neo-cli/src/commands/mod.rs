//! CLI command implementations.

mod database;
mod filter;
mod report;
mod serve;

pub use database::{run_import, run_migrate};
pub use filter::{run_filter, FilterArgs};
pub use report::{list_reports, run_report_command};
pub use serve::{run_server, ServeConfig};

use anyhow::{Context, Result};
use neo_core::db::{create_pool_with_options, DbPool};

use crate::config::AppConfig;

/// Opens the configured database pool.
pub async fn open_database(config: &AppConfig) -> Result<DbPool> {
    create_pool_with_options(&config.database.url, config.database.pool_options())
        .await
        .with_context(|| {
            format!(
                "Failed to connect to database {}",
                config.redact_secrets().database.url
            )
        })
}
