//! Askama template definitions for the dashboard.

use askama::Template;

use super::view::{FilterFormValues, FilterResultView, ReportChoice, TableView, ViewState};

// ============================================
// Report mode
// ============================================

#[derive(Template)]
#[template(path = "queries.html")]
pub struct QueriesTemplate {
    pub view: ViewState,
    pub choices: Vec<ReportChoice>,
    /// Label of the selected report, if any.
    pub selected_label: Option<String>,
    pub table: Option<TableView>,
}

// ============================================
// Filter mode
// ============================================

#[derive(Template)]
#[template(path = "filter.html")]
pub struct FilterTemplate {
    pub view: ViewState,
    pub form: FilterFormValues,
    pub result: FilterResultView,
}

// ============================================
// Errors
// ============================================

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub view: ViewState,
    pub status: u16,
    pub title: String,
    pub messages: Vec<String>,
}
