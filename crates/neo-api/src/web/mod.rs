//! Server-rendered dashboard: report mode and filter mode.

mod templates;
pub mod view;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use neo_core::{run_report, search_approaches, FilterOutcome, ReportId};
use neo_observability::{filter_span, report_span};
use serde::Deserialize;
use tracing::Instrument;

use crate::dto::FilterQuery;
use crate::error::ApiError;
use crate::state::AppState;
use templates::*;
use view::{report_choices, FilterFormValues, FilterResultView, ViewMode, ViewState};

/// Creates the dashboard router.
pub fn create_web_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/queries", get(queries_page))
        .route("/filter", get(filter_page))
        .with_state(state)
}

// ============================================
// Page Handlers
// ============================================

/// Filter mode is the landing page.
async fn home() -> Redirect {
    Redirect::to("/filter")
}

#[derive(Debug, Deserialize)]
struct QueriesParams {
    report: Option<String>,
}

/// Report mode: a selector over the catalog and the selected report's table.
async fn queries_page(
    State(state): State<AppState>,
    params: Result<Query<QueriesParams>, QueryRejection>,
) -> Result<Response, PageError> {
    let view = ViewState::new(ViewMode::Queries);
    let Query(params) = params.map_err(|e| PageError::rejected(view.clone(), e))?;

    let selected = match params.report.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(raw.parse::<ReportId>().map_err(|_| {
            PageError::new(
                view.clone(),
                ApiError::NotFound(format!("Report {} does not exist", raw)),
            )
        })?),
    };

    let table = match selected {
        Some(id) => {
            let table = run_report(state.executor.as_ref(), id)
                .instrument(report_span!(id))
                .await
                .map_err(|e| PageError::new(view.clone(), e.into()))?;
            Some(table.into())
        }
        None => None,
    };

    let template = QueriesTemplate {
        view,
        choices: report_choices(selected),
        selected_label: selected.map(|id| id.descriptor().label()),
        table,
    };
    Ok(HtmlTemplate(template).into_response())
}

/// Filter mode: the criteria form, and results once submitted.
async fn filter_page(
    State(state): State<AppState>,
    query: Result<Query<FilterQuery>, QueryRejection>,
) -> Result<Response, PageError> {
    let view = ViewState::new(ViewMode::Filter);
    let Query(query) = query.map_err(|e| PageError::rejected(view.clone(), e))?;

    if !query.is_submitted() {
        let template = FilterTemplate {
            view,
            form: FilterFormValues::from_query(&query),
            result: FilterResultView::NotSubmitted,
        };
        return Ok(HtmlTemplate(template).into_response());
    }

    let criteria = match query.to_filter() {
        Ok(criteria) => criteria,
        Err(err) => {
            let template = FilterTemplate {
                view,
                form: FilterFormValues::from_query(&query),
                result: FilterResultView::Invalid(error_lines(&err)),
            };
            return Ok(with_status(
                HtmlTemplate(template).into_response(),
                err.status_code(),
            ));
        }
    };

    let outcome = search_approaches(state.executor.as_ref(), &criteria)
        .instrument(filter_span!(criteria.hazard))
        .await
        .map_err(|e| PageError::new(view.clone(), e.into()))?;

    let result = match outcome {
        FilterOutcome::NoMatches => FilterResultView::NoMatches,
        FilterOutcome::Matches(table) => FilterResultView::Table(table.into()),
    };

    let template = FilterTemplate {
        view,
        form: FilterFormValues::from_filter(&criteria),
        result,
    };
    Ok(HtmlTemplate(template).into_response())
}

// ============================================
// Rendering
// ============================================

/// Error rendered as an HTML page with the error's status code.
#[derive(Debug)]
pub struct PageError {
    view: ViewState,
    error: ApiError,
}

impl PageError {
    pub fn new(view: ViewState, error: ApiError) -> Self {
        Self { view, error }
    }

    /// The query string could not be deserialized at all.
    fn rejected(view: ViewState, rejection: QueryRejection) -> Self {
        Self::new(view, ApiError::BadRequest(rejection.body_text()))
    }
}

fn error_lines(error: &ApiError) -> Vec<String> {
    match error {
        ApiError::ValidationError(details) => details.lines(),
        other => vec![other.to_string()],
    }
}

/// Applies `status` unless rendering already failed.
fn with_status(mut response: Response, status: StatusCode) -> Response {
    if response.status() == StatusCode::OK {
        *response.status_mut() = status;
    }
    response
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let status = self.error.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self.error, "Page request failed");
        }

        let template = ErrorTemplate {
            view: self.view,
            status: status.as_u16(),
            title: status.canonical_reason().unwrap_or("Error").to_string(),
            messages: error_lines(&self.error),
        };

        with_status(HtmlTemplate(template).into_response(), status)
    }
}

/// Wrapper for rendering askama templates as HTML responses.
pub struct HtmlTemplate<T>(pub T);

impl<T> IntoResponse for HtmlTemplate<T>
where
    T: askama::Template,
{
    fn into_response(self) -> Response {
        use axum::response::Html;

        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => {
                tracing::error!("Template rendering error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Template error: {}", err),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use neo_core::db::mocks::MockQueryExecutor;
    use neo_core::db::DbPool;
    use neo_core::{CellValue, ResultTable};
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn test_app(mock: Arc<MockQueryExecutor>) -> Router {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .connect("sqlite::memory:")
            .await
            .unwrap();
        create_web_router(AppState::new(DbPool::Sqlite(pool)).with_executor(mock))
    }

    async fn get_page(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8_lossy(&body).to_string())
    }

    fn one_row_table() -> ResultTable {
        let mut table = ResultTable::new(vec!["name".into(), "close_approach_date".into()]);
        table.push_row(vec![
            CellValue::Text("(2010 PK9)".into()),
            CellValue::Text("2024-01-12".into()),
        ]);
        table
    }

    #[tokio::test]
    async fn test_home_redirects_to_filter() {
        let app = test_app(Arc::new(MockQueryExecutor::new())).await;

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert!(response.status().is_redirection());
        assert_eq!(response.headers().get("location").unwrap(), "/filter");
    }

    #[tokio::test]
    async fn test_queries_placeholder_without_selection() {
        let mock = Arc::new(MockQueryExecutor::new());
        let app = test_app(mock.clone()).await;

        let (status, body) = get_page(app, "/queries").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Choose an option"));
        assert!(body.contains("15. Asteroids that came within 0.05 AU"));
        assert!(mock.statements().await.is_empty());
    }

    #[tokio::test]
    async fn test_queries_renders_selected_report() {
        let mock = Arc::new(MockQueryExecutor::with_table(one_row_table()));
        let app = test_app(mock.clone()).await;

        let (status, body) = get_page(app, "/queries?report=9").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<th>name</th>"));
        assert!(body.contains("(2010 PK9)"));
        assert!(body.contains(r#"<option value="9" selected>"#));
        assert_eq!(mock.statements().await.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_report_page_is_not_found() {
        let mock = Arc::new(MockQueryExecutor::new());
        let app = test_app(mock.clone()).await;

        let (status, body) = get_page(app, "/queries?report=99").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("404 Not Found"));
        assert!(mock.statements().await.is_empty());
    }

    #[tokio::test]
    async fn test_filter_form_without_submit_runs_nothing() {
        let mock = Arc::new(MockQueryExecutor::with_table(one_row_table()));
        let app = test_app(mock.clone()).await;

        let (status, body) = get_page(app, "/filter").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#"name="start_date" value="2024-01-01""#));
        assert!(body.contains("Hazardous only"));
        assert!(!body.contains("No asteroids match"));
        assert!(mock.statements().await.is_empty());
    }

    #[tokio::test]
    async fn test_filter_submit_with_no_matches_shows_notice() {
        let app = test_app(Arc::new(MockQueryExecutor::new())).await;

        let (status, body) = get_page(app, "/filter?submit=1&ld_max=1").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("No asteroids match your filter criteria."));
        assert!(body.contains(r#"name="ld_max" value="1""#));
    }

    #[tokio::test]
    async fn test_filter_submit_renders_rows() {
        let app = test_app(Arc::new(MockQueryExecutor::with_table(one_row_table()))).await;

        let (status, body) = get_page(app, "/filter?submit=1&hazard=hazardous").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("1 close approaches"));
        assert!(body.contains(r#"value="hazardous" checked"#));
    }

    #[tokio::test]
    async fn test_invalid_filter_input_keeps_form_with_errors() {
        let mock = Arc::new(MockQueryExecutor::new());
        let app = test_app(mock.clone()).await;

        let (status, body) = get_page(
            app,
            "/filter?submit=1&start_date=2024-13-40&au_max=lots&hazard=hazardous&velocity_min=5",
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.contains(r#"<form method="get" action="/filter""#));
        assert!(body.contains(r#"name="start_date" value="2024-13-40""#));
        assert!(body.contains(r#"name="au_max" value="lots""#));
        assert!(body.contains(r#"name="velocity_min" value="5""#));
        assert!(body.contains(r#"value="hazardous" checked"#));
        assert!(body.contains(r#"class="field-errors""#));
        assert!(body.contains("start_date: must be a date in YYYY-MM-DD format"));
        assert!(body.contains("au_max: "));
        assert!(!body.contains("No asteroids match"));
        assert!(mock.statements().await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_query_string_renders_html_error_page() {
        let mock = Arc::new(MockQueryExecutor::new());

        for uri in [
            "/filter?submit=1&hazard=all&hazard=all",
            "/queries?report=1&report=2",
        ] {
            let response = test_app(mock.clone())
                .await
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
            let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
            assert!(content_type.starts_with("text/html"), "{}", uri);

            let body = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let body = String::from_utf8_lossy(&body);
            assert!(body.contains("<h2>400 Bad Request</h2>"), "{}", uri);
            assert!(body.contains("duplicate field"), "{}", uri);
        }
        assert!(mock.statements().await.is_empty());
    }

    #[tokio::test]
    async fn test_cell_values_are_escaped() {
        let mut table = ResultTable::new(vec!["name".into()]);
        table.push_row(vec![CellValue::Text("<script>alert(1)</script>".into())]);
        let app = test_app(Arc::new(MockQueryExecutor::with_table(table))).await;

        let (_, body) = get_page(app, "/queries?report=7").await;

        assert!(!body.contains("<script>alert(1)</script>"));
        assert!(body.contains("&lt;script&gt;"));
    }

    #[tokio::test]
    async fn test_database_failure_renders_unavailable_page() {
        let app = test_app(Arc::new(MockQueryExecutor::unreachable("refused"))).await;

        let (status, body) = get_page(app, "/queries?report=1").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body.contains("Service unavailable"));
    }
}
