// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Global Application Error Enum.
/// Every engine operation aborts its own transaction on error and reports one of these.
#[derive(Debug, Error)]
pub enum AppError {
    /// A referenced survey, question, option or score does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The operation would break an ordering or answer-key invariant.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// The store failed mid-operation; everything was rolled back.
    #[error("transaction failure: {0}")]
    TransactionFailure(String),

    /// Malformed request payload at the HTTP edge.
    #[error("bad request: {0}")]
    BadRequest(String),
}

/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::TransactionFailure(msg) => {
                tracing::error!("Transaction failure: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvariantViolation(msg) => (StatusCode::CONFLICT, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };
        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Allows using `?` on sqlx calls. Lookups that can legitimately miss use
/// `fetch_optional` and map to `NotFound` themselves.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("row not found".to_string()),
            other => AppError::TransactionFailure(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::TransactionFailure(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::BadRequest(err.to_string())
    }
}
