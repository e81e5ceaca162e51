//! Close-approach filter command.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use colored::Colorize;
use neo_core::db::create_query_executor;
use neo_core::{search_approaches, ApproachFilter, FilterOutcome, HazardOption};
use neo_observability::filter_span;
use tracing::Instrument;

use super::open_database;
use crate::config::AppConfig;
use crate::output::{print_table, OutputFormat};

/// Filter criteria. Omitted options take the dashboard defaults.
#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// First approach date, inclusive (YYYY-MM-DD) [default: 2024-01-01]
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Last approach date, inclusive (YYYY-MM-DD) [default: 2025-12-31]
    #[arg(long)]
    pub end_date: Option<NaiveDate>,

    /// Minimum relative velocity in km/h [default: 0]
    #[arg(long)]
    pub velocity_min: Option<f64>,

    /// Maximum relative velocity in km/h [default: 150000]
    #[arg(long)]
    pub velocity_max: Option<f64>,

    /// Minimum estimated diameter in km [default: 0]
    #[arg(long)]
    pub diameter_min: Option<f64>,

    /// Maximum estimated diameter in km [default: 20]
    #[arg(long)]
    pub diameter_max: Option<f64>,

    /// Minimum miss distance in AU [default: 0]
    #[arg(long)]
    pub au_min: Option<f64>,

    /// Maximum miss distance in AU [default: 5]
    #[arg(long)]
    pub au_max: Option<f64>,

    /// Minimum miss distance in lunar distances [default: 0]
    #[arg(long)]
    pub ld_min: Option<f64>,

    /// Maximum miss distance in lunar distances [default: 10]
    #[arg(long)]
    pub ld_max: Option<f64>,

    /// Hazard classification: all, hazardous, non-hazardous [default: all]
    #[arg(long)]
    pub hazard: Option<HazardOption>,
}

impl FilterArgs {
    /// Effective criteria: given options over the defaults.
    pub fn to_filter(&self) -> ApproachFilter {
        let d = ApproachFilter::default();
        ApproachFilter {
            start_date: self.start_date.unwrap_or(d.start_date),
            end_date: self.end_date.unwrap_or(d.end_date),
            velocity_min: self.velocity_min.unwrap_or(d.velocity_min),
            velocity_max: self.velocity_max.unwrap_or(d.velocity_max),
            diameter_min: self.diameter_min.unwrap_or(d.diameter_min),
            diameter_max: self.diameter_max.unwrap_or(d.diameter_max),
            au_min: self.au_min.unwrap_or(d.au_min),
            au_max: self.au_max.unwrap_or(d.au_max),
            ld_min: self.ld_min.unwrap_or(d.ld_min),
            ld_max: self.ld_max.unwrap_or(d.ld_max),
            hazard: self.hazard.unwrap_or(d.hazard),
        }
    }
}

/// Runs the filter against the configured database and prints the result.
pub async fn run_filter(config: &AppConfig, args: &FilterArgs, format: OutputFormat) -> Result<()> {
    let criteria = args.to_filter();
    let pool = open_database(config).await?;
    let executor = create_query_executor(&pool);

    let outcome = search_approaches(executor.as_ref(), &criteria)
        .instrument(filter_span!(criteria.hazard))
        .await
        .context("Approach filter failed")?;

    if matches!(outcome, FilterOutcome::NoMatches) && format == OutputFormat::Text {
        println!("{}", "No asteroids match your filter criteria.".yellow());
    } else {
        print_table(&outcome.into_table(), format)?;
    }

    pool.close().await;
    Ok(())
}
