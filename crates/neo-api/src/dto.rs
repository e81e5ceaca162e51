//! Data Transfer Objects for the JSON API.

use chrono::NaiveDate;
use neo_core::{ApproachFilter, CellValue, HazardOption, ReportDescriptor, ResultTable};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::ApiError;

// ============================================================================
// Report DTOs
// ============================================================================

/// A catalog report as listed by the API.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReportSummary {
    pub id: u8,
    pub title: String,
    /// Title prefixed with the report number.
    pub label: String,
    /// Projected column names, in order.
    pub columns: Vec<String>,
}

impl From<&ReportDescriptor> for ReportSummary {
    fn from(descriptor: &ReportDescriptor) -> Self {
        Self {
            id: descriptor.id.get(),
            title: descriptor.title.to_string(),
            label: descriptor.label(),
            columns: descriptor.columns.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Tabular result: column names and rows of JSON scalars.
#[derive(Debug, Serialize, ToSchema)]
pub struct TableResponse {
    pub columns: Vec<String>,
    #[schema(value_type = Vec<Vec<Object>>)]
    pub rows: Vec<Vec<CellValue>>,
}

impl From<ResultTable> for TableResponse {
    fn from(table: ResultTable) -> Self {
        Self {
            columns: table.columns,
            rows: table.rows,
        }
    }
}

/// One executed report.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReportResponse {
    pub report: ReportSummary,
    pub table: TableResponse,
}

// ============================================================================
// Approach filter DTOs
// ============================================================================

/// Filter criteria as received from a query string.
///
/// Values arrive as text so that each malformed field can be reported
/// individually. Blank or missing fields take the default criteria.
/// Nothing here reaches SQL text: fields are parsed into typed criteria
/// and bound as statement parameters.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FilterQuery {
    /// Present when the filter form's submit button was used.
    pub submit: Option<String>,
    /// First approach date, YYYY-MM-DD (inclusive).
    pub start_date: Option<String>,
    /// Last approach date, YYYY-MM-DD (inclusive).
    pub end_date: Option<String>,
    /// Minimum relative velocity in km/h.
    pub velocity_min: Option<String>,
    /// Maximum relative velocity in km/h.
    pub velocity_max: Option<String>,
    /// Lower bound on the estimated minimum diameter, km.
    pub diameter_min: Option<String>,
    /// Upper bound on the estimated maximum diameter, km.
    pub diameter_max: Option<String>,
    /// Minimum miss distance in astronomical units.
    pub au_min: Option<String>,
    /// Maximum miss distance in astronomical units.
    pub au_max: Option<String>,
    /// Minimum miss distance in lunar distances.
    pub ld_min: Option<String>,
    /// Maximum miss distance in lunar distances.
    pub ld_max: Option<String>,
    /// all, hazardous or non-hazardous.
    pub hazard: Option<String>,
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

fn validate_date(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok() {
        Ok(())
    } else {
        Err(invalid("invalid_date", "must be a date in YYYY-MM-DD format"))
    }
}

fn validate_number(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(());
    }
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(()),
        Ok(_) => Err(invalid("not_finite", "must be a finite number")),
        Err(_) => Err(invalid("invalid_number", "must be a number")),
    }
}

fn validate_hazard(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || HazardOption::from_str(value).is_ok() {
        Ok(())
    } else {
        Err(invalid(
            "invalid_choice",
            "must be one of all, hazardous, non-hazardous",
        ))
    }
}

impl Validate for FilterQuery {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let dates = [
            ("start_date", &self.start_date),
            ("end_date", &self.end_date),
        ];
        let numbers = [
            ("velocity_min", &self.velocity_min),
            ("velocity_max", &self.velocity_max),
            ("diameter_min", &self.diameter_min),
            ("diameter_max", &self.diameter_max),
            ("au_min", &self.au_min),
            ("au_max", &self.au_max),
            ("ld_min", &self.ld_min),
            ("ld_max", &self.ld_max),
        ];

        for (field, value) in dates {
            if let Some(Err(e)) = value.as_deref().map(validate_date) {
                errors.add(field, e);
            }
        }
        for (field, value) in numbers {
            if let Some(Err(e)) = value.as_deref().map(validate_number) {
                errors.add(field, e);
            }
        }
        if let Some(Err(e)) = self.hazard.as_deref().map(validate_hazard) {
            errors.add("hazard", e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn date_or(value: &Option<String>, default: NaiveDate) -> NaiveDate {
    present(value)
        .and_then(|v| NaiveDate::parse_from_str(v, "%Y-%m-%d").ok())
        .unwrap_or(default)
}

fn number_or(value: &Option<String>, default: f64) -> f64 {
    present(value)
        .and_then(|v| v.parse::<f64>().ok())
        .unwrap_or(default)
}

impl FilterQuery {
    /// True when the request came from the form's submit action.
    pub fn is_submitted(&self) -> bool {
        self.submit.is_some()
    }

    /// Validates every field and builds the criteria.
    pub fn to_filter(&self) -> Result<ApproachFilter, ApiError> {
        self.validate()?;

        let defaults = ApproachFilter::default();
        let hazard = match present(&self.hazard) {
            Some(value) => HazardOption::from_str(value)?,
            None => defaults.hazard,
        };

        Ok(ApproachFilter {
            start_date: date_or(&self.start_date, defaults.start_date),
            end_date: date_or(&self.end_date, defaults.end_date),
            velocity_min: number_or(&self.velocity_min, defaults.velocity_min),
            velocity_max: number_or(&self.velocity_max, defaults.velocity_max),
            diameter_min: number_or(&self.diameter_min, defaults.diameter_min),
            diameter_max: number_or(&self.diameter_max, defaults.diameter_max),
            au_min: number_or(&self.au_min, defaults.au_min),
            au_max: number_or(&self.au_max, defaults.au_max),
            ld_min: number_or(&self.ld_min, defaults.ld_min),
            ld_max: number_or(&self.ld_max, defaults.ld_max),
            hazard,
        })
    }
}

/// Result of one approach filter run.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApproachesResponse {
    /// False when the query succeeded but matched nothing.
    pub matched: bool,
    pub row_count: usize,
    /// Effective criteria after defaults were applied.
    #[schema(value_type = Object)]
    pub criteria: ApproachFilter,
    pub table: TableResponse,
}

// ============================================================================
// Health DTOs
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: DatabaseHealth,
    pub uptime_seconds: u64,
}

/// Database health status.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DatabaseHealth {
    /// "sqlite" or "mysql".
    pub backend: String,
    pub connected: bool,
    pub pool_size: u32,
    pub idle_connections: usize,
}
