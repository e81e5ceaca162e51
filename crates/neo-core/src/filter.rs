//! Close-approach filter: criteria in, one parameterized statement out.
//!
//! The statement text depends only on the hazard option. Every date and
//! numeric bound travels as a bound parameter, never as SQL text.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

use crate::db::{DbError, QueryExecutor, Statement};
use crate::table::ResultTable;

/// Columns returned by the filter, in order.
pub const FILTER_COLUMNS: &[&str] = &[
    "asteroid_id",
    "name",
    "absolute_magnitude_h",
    "estimated_diameter_min_km",
    "estimated_diameter_max_km",
    "is_potentially_hazardous_asteroid",
    "close_approach_date",
    "relative_velocity_kmph",
    "astronomical",
    "miss_distance_km",
    "miss_distance_lunar",
];

const BASE_SELECT: &str = r#"SELECT a.asteroid_id,
       a.name,
       a.absolute_magnitude_h,
       a.estimated_diameter_min_km,
       a.estimated_diameter_max_km,
       a.is_potentially_hazardous_asteroid,
       c.close_approach_date,
       c.relative_velocity_kmph,
       c.astronomical,
       c.miss_distance_km,
       c.miss_distance_lunar
FROM asteroids a
JOIN close_approach c ON a.asteroid_id = c.asteroid_id
WHERE c.close_approach_date BETWEEN ? AND ?
  AND c.relative_velocity_kmph BETWEEN ? AND ?
  AND a.estimated_diameter_min_km >= ?
  AND a.estimated_diameter_max_km <= ?
  AND c.astronomical BETWEEN ? AND ?
  AND c.miss_distance_lunar BETWEEN ? AND ?"#;

const HAZARD_PREDICATE: &str = "\n  AND a.is_potentially_hazardous_asteroid = ?";

const ORDER_BY: &str = "\nORDER BY c.close_approach_date ASC";

/// Three-way hazard restriction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HazardOption {
    #[default]
    All,
    #[serde(rename = "hazardous")]
    HazardousOnly,
    #[serde(rename = "non-hazardous")]
    NonHazardousOnly,
}

impl HazardOption {
    pub const ALL: [HazardOption; 3] = [
        HazardOption::All,
        HazardOption::HazardousOnly,
        HazardOption::NonHazardousOnly,
    ];

    /// Value used in query strings and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            HazardOption::All => "all",
            HazardOption::HazardousOnly => "hazardous",
            HazardOption::NonHazardousOnly => "non-hazardous",
        }
    }

    /// Label shown next to the radio control.
    pub fn label(&self) -> &'static str {
        match self {
            HazardOption::All => "All",
            HazardOption::HazardousOnly => "Hazardous only",
            HazardOption::NonHazardousOnly => "Non-hazardous only",
        }
    }

    /// Flag value to match, or `None` for no restriction.
    pub fn required_flag(&self) -> Option<bool> {
        match self {
            HazardOption::All => None,
            HazardOption::HazardousOnly => Some(true),
            HazardOption::NonHazardousOnly => Some(false),
        }
    }
}

impl fmt::Display for HazardOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HazardOption {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        HazardOption::ALL
            .into_iter()
            .find(|option| {
                option.as_str() == normalized || option.label().to_ascii_lowercase() == normalized
            })
            .ok_or_else(|| FilterError::UnknownHazardOption(s.to_string()))
    }
}

/// Errors for criteria that cannot be turned into a statement.
#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },

    #[error("unknown hazard option: {0}")]
    UnknownHazardOption(String),
}

/// Filter criteria. Every bound is inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApproachFilter {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub velocity_min: f64,
    pub velocity_max: f64,
    /// Lower bound on the asteroid's estimated minimum diameter.
    pub diameter_min: f64,
    /// Upper bound on the asteroid's estimated maximum diameter.
    pub diameter_max: f64,
    pub au_min: f64,
    pub au_max: f64,
    pub ld_min: f64,
    pub ld_max: f64,
    #[serde(default)]
    pub hazard: HazardOption,
}

impl Default for ApproachFilter {
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap_or_default(),
            velocity_min: 0.0,
            velocity_max: 150_000.0,
            diameter_min: 0.0,
            diameter_max: 20.0,
            au_min: 0.0,
            au_max: 5.0,
            ld_min: 0.0,
            ld_max: 10.0,
            hazard: HazardOption::All,
        }
    }
}

impl ApproachFilter {
    fn numeric_bounds(&self) -> [(&'static str, f64); 8] {
        [
            ("velocity_min", self.velocity_min),
            ("velocity_max", self.velocity_max),
            ("diameter_min", self.diameter_min),
            ("diameter_max", self.diameter_max),
            ("au_min", self.au_min),
            ("au_max", self.au_max),
            ("ld_min", self.ld_min),
            ("ld_max", self.ld_max),
        ]
    }

    /// Rejects NaN and infinite bounds.
    pub fn check(&self) -> Result<(), FilterError> {
        match self.numeric_bounds().into_iter().find(|(_, v)| !v.is_finite()) {
            Some((field, _)) => Err(FilterError::NonFinite { field }),
            None => Ok(()),
        }
    }
}

/// Builds the filter statement for `filter`.
pub fn build_filter_statement(filter: &ApproachFilter) -> Result<Statement, FilterError> {
    filter.check()?;

    let mut statement = Statement::new(BASE_SELECT);
    statement
        .bind(filter.start_date)
        .bind(filter.end_date)
        .bind(filter.velocity_min)
        .bind(filter.velocity_max)
        .bind(filter.diameter_min)
        .bind(filter.diameter_max)
        .bind(filter.au_min)
        .bind(filter.au_max)
        .bind(filter.ld_min)
        .bind(filter.ld_max);

    if let Some(flag) = filter.hazard.required_flag() {
        statement.push_sql(HAZARD_PREDICATE).bind(flag);
    }

    statement.push_sql(ORDER_BY);
    Ok(statement)
}

/// Result of running the filter.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOutcome {
    /// The query succeeded and matched nothing.
    NoMatches,
    Matches(ResultTable),
}

impl FilterOutcome {
    pub fn row_count(&self) -> usize {
        match self {
            FilterOutcome::NoMatches => 0,
            FilterOutcome::Matches(table) => table.len(),
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, FilterOutcome::Matches(_))
    }

    /// The matched rows, or an empty table with the filter's columns.
    pub fn into_table(self) -> ResultTable {
        match self {
            FilterOutcome::NoMatches => {
                ResultTable::new(FILTER_COLUMNS.iter().map(|c| c.to_string()).collect())
            }
            FilterOutcome::Matches(table) => table,
        }
    }
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Database(#[from] DbError),
}

/// Builds and executes the filter statement once.
pub async fn search_approaches(
    executor: &dyn QueryExecutor,
    filter: &ApproachFilter,
) -> Result<FilterOutcome, SearchError> {
    let statement = build_filter_statement(filter)?;
    let table = executor.fetch_table(&statement).await?;

    info!(
        hazard = %filter.hazard,
        rows = table.len(),
        "Approach filter executed"
    );

    if table.is_empty() {
        Ok(FilterOutcome::NoMatches)
    } else {
        Ok(FilterOutcome::Matches(table))
    }
}
