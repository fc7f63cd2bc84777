use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use civica_core::error::CoreError;
use civica_core::validation::ValidationReport;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `civica_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A missing resource (survey session).
    #[error("{0} not found")]
    NotFound(&'static str),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::AcknowledgementRequired => (
                    StatusCode::FORBIDDEN,
                    "ACKNOWLEDGEMENT_REQUIRED",
                    core.to_string(),
                ),
                CoreError::DuplicateSubmission { .. } => (
                    StatusCode::CONFLICT,
                    "DUPLICATE_SUBMISSION",
                    core.to_string(),
                ),
                CoreError::Persistence(msg) => {
                    tracing::error!(error = %msg, "Persistence backend failure");
                    (
                        StatusCode::BAD_GATEWAY,
                        "PERSISTENCE_ERROR",
                        "Failed to save the survey response. Please try again.".to_string(),
                    )
                }
                CoreError::Storage(msg) => {
                    tracing::error!(error = %msg, "Storage failure");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{what} not found"),
            ),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Build the 422 response carrying per-field validation errors.
///
/// Field errors are recoverable and shown inline; the map keys are the
/// fields' wire names.
pub fn field_errors_response(report: &ValidationReport) -> Response {
    let body = json!({
        "error": "One or more fields are invalid",
        "code": "FIELD_VALIDATION",
        "fields": report.errors,
    });
    (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(body)).into_response()
}
