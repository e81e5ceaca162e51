//! Schema migration and CSV seeding commands.

use anyhow::{Context, Result};
use colored::Colorize;
use neo_core::db::{import_csv, run_migrations, ImportSummary};
use std::path::Path;

use super::open_database;
use crate::config::AppConfig;

/// Applies pending schema migrations.
pub async fn run_migrate(config: &AppConfig) -> Result<()> {
    let pool = open_database(config).await?;

    println!("  {} Running migrations...", "→".green());
    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    println!("  {} Migrations complete", "✓".green());

    pool.close().await;
    Ok(())
}

/// Migrates the schema, then loads both CSV files in one transaction.
pub async fn run_import(
    config: &AppConfig,
    asteroids: &Path,
    approaches: &Path,
) -> Result<ImportSummary> {
    let pool = open_database(config).await?;

    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    println!(
        "  {} Importing {} and {}",
        "→".green(),
        asteroids.display(),
        approaches.display()
    );
    let summary = import_csv(&pool, asteroids, approaches)
        .await
        .context("Import failed; no rows were written")?;

    println!(
        "  {} Imported {} asteroids and {} close approaches",
        "✓".green(),
        summary.asteroids,
        summary.approaches
    );

    pool.close().await;
    Ok(summary)
}
