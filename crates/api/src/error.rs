use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use upkeep_core::error::CoreError;
use upkeep_core::report::ReportError;
use upkeep_db::reporting::ReportExecutionError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `upkeep_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A report configuration rejected during validation.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// A saved configuration document that no longer deserializes.
    #[error("Stored report configuration is corrupt: {0}")]
    CorruptConfig(#[from] serde_json::Error),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Request body failed field-level validation.
    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<ReportExecutionError> for AppError {
    fn from(err: ReportExecutionError) -> Self {
        match err {
            ReportExecutionError::Invalid(e) => AppError::Report(e),
            ReportExecutionError::DataStore(e) => AppError::Database(e),
            ReportExecutionError::CorruptConfig(e) => AppError::CorruptConfig(e),
        }
    }
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(CoreError::NotFound { entity, id }) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{entity} with id {id} not found"),
            ),

            // --- Report configuration errors ---
            // Each variant carries a stable machine-readable code so clients
            // can highlight the offending part of the configuration form.
            AppError::Report(report) => (StatusCode::BAD_REQUEST, report.code(), report.to_string()),

            AppError::CorruptConfig(err) => {
                tracing::error!(error = %err, "Stored report configuration failed to deserialize");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CORRUPT_REPORT_CONFIG",
                    "Stored report configuration is corrupt".to_string(),
                )
            }

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- Request body validation ---
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                errors.to_string(),
            ),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
