//! API error types and handling.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use neo_core::db::DbError;
use neo_core::{FilterError, SearchError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use utoipa::ToSchema;

/// API error type.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request could not be parsed at all (e.g. a malformed query string).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Validation error with field-level details.
    #[error("Validation failed")]
    ValidationError(ValidationErrorDetails),

    /// Database reachable but the statement failed.
    #[error("Database error: {0}")]
    Database(String),

    /// Database unreachable or pool exhausted.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Details for field-level validation errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetails {
    /// Overall validation error message.
    pub message: String,
    /// Field-specific errors, ordered by field name.
    pub fields: BTreeMap<String, Vec<FieldError>>,
}

/// A single field validation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldError {
    /// Error code (e.g., "invalid_date", "invalid_number").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ValidationErrorDetails {
    /// Creates a new validation error with a single field error.
    pub fn field(field: &str, code: &str, message: &str) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(
            field.to_string(),
            vec![FieldError {
                code: code.to_string(),
                message: message.to_string(),
            }],
        );
        Self::from_fields(fields)
    }

    /// Creates a validation error from multiple field errors.
    pub fn from_fields(fields: BTreeMap<String, Vec<FieldError>>) -> Self {
        let message = match fields.keys().next() {
            Some(field) if fields.len() == 1 => {
                format!("Validation failed for field '{}'", field)
            }
            _ => format!("Validation failed for {} fields", fields.len()),
        };
        Self { message, fields }
    }

    /// One line per field error, for rendering on an HTML page.
    pub fn lines(&self) -> Vec<String> {
        self.fields
            .iter()
            .flat_map(|(field, errors)| {
                errors
                    .iter()
                    .map(move |e| format!("{}: {}", field, e.message))
            })
            .collect()
    }
}

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional error details (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Returns the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::ValidationError(_) => "VALIDATION_ERROR",
            ApiError::Database(_) => "DATABASE_ERROR",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    /// Creates a validation error for a single field.
    pub fn validation_field(field: &str, code: &str, message: &str) -> Self {
        ApiError::ValidationError(ValidationErrorDetails::field(field, code, message))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (message, details) = match &self {
            ApiError::ValidationError(details) => (
                details.message.clone(),
                Some(serde_json::to_value(&details.fields).unwrap_or_default()),
            ),
            _ => (self.to_string(), None),
        };

        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "Request failed");
        }

        let body = ErrorResponse {
            code: self.error_code().to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Connection(msg) => ApiError::ServiceUnavailable(msg),
            DbError::PoolExhausted => {
                ApiError::ServiceUnavailable("Connection pool exhausted".to_string())
            }
            err => ApiError::Database(err.to_string()),
        }
    }
}

impl From<FilterError> for ApiError {
    fn from(err: FilterError) -> Self {
        match &err {
            FilterError::NonFinite { field } => {
                ApiError::validation_field(field, "not_finite", &err.to_string())
            }
            FilterError::UnknownHazardOption(_) => {
                ApiError::validation_field("hazard", "invalid_choice", &err.to_string())
            }
        }
    }
}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::Filter(e) => e.into(),
            SearchError::Database(e) => e.into(),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut fields: BTreeMap<String, Vec<FieldError>> = BTreeMap::new();

        for (field_name, field_errors) in err.field_errors() {
            let errors: Vec<FieldError> = field_errors
                .iter()
                .map(|e| {
                    let code = e.code.to_string();
                    let message = e.message.clone().map(|m| m.to_string()).unwrap_or_else(|| {
                        format!("Field '{}' failed validation: {}", field_name, code)
                    });
                    FieldError { code, message }
                })
                .collect();
            fields.insert(field_name.to_string(), errors);
        }

        ApiError::ValidationError(ValidationErrorDetails::from_fields(fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_errors_map_to_status() {
        let unreachable: ApiError = DbError::Connection("refused".into()).into();
        assert_eq!(unreachable.status_code(), StatusCode::SERVICE_UNAVAILABLE);

        let broken: ApiError = DbError::Query("no such table".into()).into();
        assert_eq!(broken.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(broken.error_code(), "DATABASE_ERROR");

        let exhausted: ApiError = DbError::PoolExhausted.into();
        assert_eq!(exhausted.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_filter_error_is_field_validation() {
        let err: ApiError = FilterError::NonFinite { field: "ld_max" }.into();
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        match err {
            ApiError::ValidationError(details) => {
                assert!(details.fields.contains_key("ld_max"));
                assert_eq!(details.message, "Validation failed for field 'ld_max'");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_lines_list_fields_in_order() {
        let mut fields = BTreeMap::new();
        for name in ["start_date", "au_max"] {
            fields.insert(
                name.to_string(),
                vec![FieldError {
                    code: "invalid".into(),
                    message: "bad value".into(),
                }],
            );
        }
        let details = ValidationErrorDetails::from_fields(fields);
        assert_eq!(details.lines(), vec!["au_max: bad value", "start_date: bad value"]);
        assert_eq!(details.message, "Validation failed for 2 fields");
    }

    #[test]
    fn test_bad_request_status() {
        let err = ApiError::BadRequest("malformed query string".into());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_into_response_body() {
        let response = ApiError::NotFound("report 99".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.code, "NOT_FOUND");
        assert!(parsed.details.is_none());
    }
}
