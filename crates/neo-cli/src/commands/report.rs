//! Catalog report commands.

use anyhow::{Context, Result};
use colored::Colorize;
use neo_core::db::create_query_executor;
use neo_core::{run_report, ReportId, CATALOG};
use neo_observability::report_span;
use tracing::Instrument;

use super::open_database;
use crate::config::AppConfig;
use crate::output::{print_table, OutputFormat};

/// Prints the report catalog.
pub fn list_reports(format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        let entries: Vec<_> = CATALOG
            .iter()
            .map(|d| {
                serde_json::json!({
                    "id": d.id.get(),
                    "title": d.title,
                    "columns": d.columns,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("{}", "Reports".bold());
    println!("───────");
    for descriptor in CATALOG.iter() {
        println!(
            "  {}. {}",
            format!("{:>2}", descriptor.id.get()).cyan(),
            descriptor.title
        );
    }
    Ok(())
}

/// Runs one report against the configured database and prints its table.
pub async fn run_report_command(
    config: &AppConfig,
    id: ReportId,
    format: OutputFormat,
) -> Result<()> {
    let pool = open_database(config).await?;
    let executor = create_query_executor(&pool);

    let table = run_report(executor.as_ref(), id)
        .instrument(report_span!(id))
        .await
        .with_context(|| format!("Report {} failed", id))?;

    if format == OutputFormat::Text {
        println!("{}", id.descriptor().label().bold());
        println!();
    }
    print_table(&table, format)?;

    pool.close().await;
    Ok(())
}
