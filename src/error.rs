//! Application error type shared by all layers.
//!
//! The core only distinguishes error kinds; mapping kinds to HTTP status
//! codes happens exclusively in the [`IntoResponse`] implementation.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use std::fmt;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

#[derive(Serialize)]
struct ErrorInfo {
    code: &'static str,
    message: String,
    details: Value,
}

/// Error kinds produced by the shorty core.
#[derive(Debug)]
pub enum AppError {
    /// Malformed or missing input (bad URL shape, bad filter field, ...).
    Validation { message: String, details: Value },
    /// A live record already owns the unique field being written.
    Conflict { message: String, details: Value },
    /// No record matched a keyed operation.
    NotFound { message: String, details: Value },
    /// Code generation could not find a free short code within the retry bound.
    ExhaustedRetries { message: String, details: Value },
    /// Persistence failure unrelated to uniqueness.
    Storage { message: String, details: Value },
    /// A component was constructed with invalid settings.
    InvalidConfiguration { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn exhausted_retries(message: impl Into<String>, details: Value) -> Self {
        Self::ExhaustedRetries {
            message: message.into(),
            details,
        }
    }
    pub fn storage(message: impl Into<String>, details: Value) -> Self {
        Self::Storage {
            message: message.into(),
            details,
        }
    }
    pub fn invalid_configuration(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
            details,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Validation { message, .. }
            | Self::Conflict { message, .. }
            | Self::NotFound { message, .. }
            | Self::ExhaustedRetries { message, .. }
            | Self::Storage { message, .. }
            | Self::InvalidConfiguration { message, .. } => message,
        }
    }

    /// Name of the violated unique constraint, when this is a storage-level
    /// conflict. Lets callers tell a short-code collision apart from a
    /// duplicate URL without re-querying.
    pub fn constraint(&self) -> Option<&str> {
        match self {
            Self::Conflict { details, .. } => details.get("constraint").and_then(Value::as_str),
            _ => None,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            return AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": db.constraint() }),
            );
        }

        AppError::storage("Database error", json!({ "reason": e.to_string() }))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&e).unwrap_or_else(|_| json!({}));
        AppError::bad_request("Invalid request body", details)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            AppError::Validation { message, details } => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                message,
                details,
            ),
            AppError::Conflict { message, details } => {
                (StatusCode::CONFLICT, "conflict", message, details)
            }
            AppError::NotFound { message, details } => {
                (StatusCode::NOT_FOUND, "not_found", message, details)
            }
            AppError::ExhaustedRetries { message, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "exhausted_retries",
                message,
                details,
            ),
            AppError::Storage { message, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                message,
                details,
            ),
            AppError::InvalidConfiguration { message, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "invalid_configuration",
                message,
                details,
            ),
        };

        let body = ErrorBody {
            error: ErrorInfo {
                code,
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}
