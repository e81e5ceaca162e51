//! View state passed into page rendering.
//!
//! Handlers build these values from the request and the query results;
//! templates only read them.

use neo_core::{ApproachFilter, HazardOption, ReportId, ResultTable, CATALOG};

use crate::dto::FilterQuery;

/// Which of the two dashboard modes is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Queries,
    Filter,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Queries => "queries",
            ViewMode::Filter => "filter",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ViewMode::Queries => "Queries",
            ViewMode::Filter => "Filter Criteria",
        }
    }
}

/// Navigation state shared by every page.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub mode: ViewMode,
}

impl ViewState {
    pub fn new(mode: ViewMode) -> Self {
        Self { mode }
    }

    pub fn is_queries(&self) -> bool {
        self.mode == ViewMode::Queries
    }

    pub fn is_filter(&self) -> bool {
        self.mode == ViewMode::Filter
    }
}

/// A result table with every cell already formatted for display.
#[derive(Debug, Clone)]
pub struct TableView {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl From<ResultTable> for TableView {
    fn from(table: ResultTable) -> Self {
        Self {
            rows: table
                .rows
                .iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect(),
            columns: table.columns,
        }
    }
}

/// One entry of the report selector.
#[derive(Debug, Clone)]
pub struct ReportChoice {
    pub id: String,
    pub label: String,
    pub selected: bool,
}

/// Builds the report selector with `selected` marked.
pub fn report_choices(selected: Option<ReportId>) -> Vec<ReportChoice> {
    CATALOG
        .iter()
        .map(|d| ReportChoice {
            id: d.id.to_string(),
            label: d.label(),
            selected: Some(d.id) == selected,
        })
        .collect()
}

/// One hazard radio button.
#[derive(Debug, Clone)]
pub struct HazardChoice {
    pub value: String,
    pub label: String,
    pub checked: bool,
}

/// Values echoed back into the filter form inputs.
#[derive(Debug, Clone)]
pub struct FilterFormValues {
    pub start_date: String,
    pub end_date: String,
    pub velocity_min: String,
    pub velocity_max: String,
    pub diameter_min: String,
    pub diameter_max: String,
    pub au_min: String,
    pub au_max: String,
    pub ld_min: String,
    pub ld_max: String,
    pub hazard_choices: Vec<HazardChoice>,
}

impl FilterFormValues {
    /// Populates the form from effective criteria.
    pub fn from_filter(filter: &ApproachFilter) -> Self {
        Self {
            start_date: filter.start_date.format("%Y-%m-%d").to_string(),
            end_date: filter.end_date.format("%Y-%m-%d").to_string(),
            velocity_min: filter.velocity_min.to_string(),
            velocity_max: filter.velocity_max.to_string(),
            diameter_min: filter.diameter_min.to_string(),
            diameter_max: filter.diameter_max.to_string(),
            au_min: filter.au_min.to_string(),
            au_max: filter.au_max.to_string(),
            ld_min: filter.ld_min.to_string(),
            ld_max: filter.ld_max.to_string(),
            hazard_choices: hazard_choices(filter.hazard),
        }
    }

    /// Populates the form from raw input, keeping what the user typed even
    /// when it failed validation.
    pub fn from_query(query: &FilterQuery) -> Self {
        let defaults = Self::from_filter(&ApproachFilter::default());
        let pick = |value: &Option<String>, default: String| value.clone().unwrap_or(default);
        let hazard = query
            .hazard
            .as_deref()
            .and_then(|h| h.parse::<HazardOption>().ok())
            .unwrap_or_default();

        Self {
            start_date: pick(&query.start_date, defaults.start_date),
            end_date: pick(&query.end_date, defaults.end_date),
            velocity_min: pick(&query.velocity_min, defaults.velocity_min),
            velocity_max: pick(&query.velocity_max, defaults.velocity_max),
            diameter_min: pick(&query.diameter_min, defaults.diameter_min),
            diameter_max: pick(&query.diameter_max, defaults.diameter_max),
            au_min: pick(&query.au_min, defaults.au_min),
            au_max: pick(&query.au_max, defaults.au_max),
            ld_min: pick(&query.ld_min, defaults.ld_min),
            ld_max: pick(&query.ld_max, defaults.ld_max),
            hazard_choices: hazard_choices(hazard),
        }
    }
}

fn hazard_choices(selected: HazardOption) -> Vec<HazardChoice> {
    HazardOption::ALL
        .iter()
        .map(|option| HazardChoice {
            value: option.as_str().to_string(),
            label: option.label().to_string(),
            checked: *option == selected,
        })
        .collect()
}

/// What the filter page shows under the form.
#[derive(Debug, Clone)]
pub enum FilterResultView {
    /// The form has not been submitted yet.
    NotSubmitted,
    /// Submitted input failed validation; one message per field error.
    Invalid(Vec<String>),
    NoMatches,
    Table(TableView),
}
