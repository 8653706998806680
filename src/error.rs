//! Application error type shared by every layer.
//!
//! Each variant maps to exactly one HTTP status in [`IntoResponse`]. Storage
//! failures never leak their detail to clients; it is logged instead.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::utils::db_error::is_unique_violation_on_code;

/// Error returned by services, repositories and handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The target URL is missing, not a string, or not an absolute http(s) URL.
    #[error("{message}")]
    InvalidUrl { message: String, details: Value },

    /// A custom short code does not match `[A-Za-z0-9]{6,8}` or is reserved.
    #[error("{message}")]
    InvalidCodeFormat { message: String, details: Value },

    /// Malformed request that is neither a URL nor a code problem.
    #[error("{message}")]
    BadRequest { message: String, details: Value },

    /// The short code is already taken. Only raised by the store.
    #[error("{message}")]
    CodeConflict { message: String, details: Value },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// Unexpected storage failure. The message is for logs only.
    #[error("{message}")]
    Storage { message: String, details: Value },
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    code: &'static str,
    #[serde(skip_serializing_if = "Value::is_null")]
    details: Value,
}

impl AppError {
    pub fn invalid_url(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidUrl {
            message: message.into(),
            details,
        }
    }

    pub fn invalid_code_format(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidCodeFormat {
            message: message.into(),
            details,
        }
    }

    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::BadRequest {
            message: message.into(),
            details,
        }
    }

    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::CodeConflict {
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

    pub fn storage(message: impl Into<String>, details: Value) -> Self {
        Self::Storage {
            message: message.into(),
            details,
        }
    }

    /// Machine-readable error code used in response bodies.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidUrl { .. } => "invalid_url",
            AppError::InvalidCodeFormat { .. } => "invalid_code_format",
            AppError::BadRequest { .. } => "bad_request",
            AppError::CodeConflict { .. } => "code_conflict",
            AppError::NotFound { .. } => "not_found",
            AppError::Storage { .. } => "storage_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidUrl { .. }
            | AppError::InvalidCodeFormat { .. }
            | AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::CodeConflict { .. } => StatusCode::CONFLICT,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns true for failures worth retrying (storage hiccups).
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::Storage { .. })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let body = match &self {
            AppError::Storage { message, details } => {
                tracing::error!(error = %message, details = %details, "Storage failure");
                ErrorBody {
                    error: "Internal server error",
                    code,
                    details: Value::Null,
                }
            }
            AppError::InvalidUrl { message, details }
            | AppError::InvalidCodeFormat { message, details }
            | AppError::BadRequest { message, details }
            | AppError::CodeConflict { message, details }
            | AppError::NotFound { message, details } => ErrorBody {
                error: message,
                code,
                details: details.clone(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if is_unique_violation_on_code(&e) {
            return AppError::conflict("Code already exists", json!({}));
        }

        AppError::storage("Database error", json!({ "reason": e.to_string() }))
    }
}
