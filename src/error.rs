//! Backend error types with HTTP status code mapping.
//!
//! [`ServerError`] is the central error type of the reference backend.
//! Each variant maps to a specific HTTP status code and structured JSON
//! error response, which [`crate::client::ApiClient`] knows how to read.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::model::{ReportStatus, ValidationError};

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1002,
///     "message": "invalid input: description is required",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see the table on [`ServerError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category         | HTTP Status                  |
/// |-----------|------------------|------------------------------|
/// | 1000–1999 | Validation       | 400 Bad Request              |
/// | 2000–2099 | Not Found        | 404 Not Found                |
/// | 2100–2199 | State Conflict   | 409 Conflict                 |
/// | 3000–3999 | Server           | 500 Internal Server Error    |
/// | 4000–4999 | Authentication   | 401 Unauthorized             |
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Malformed request (bad path or query value).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Request body failed domain validation.
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Missing, unknown or expired bearer token.
    #[error("unauthorized: missing or expired session")]
    Unauthorized,

    /// Login with an unknown e-mail or wrong password.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Registration with an e-mail that already has an account.
    #[error("email already registered: {0}")]
    EmailTaken(String),

    /// Session points at a user that no longer exists.
    #[error("user not found: {0}")]
    UserNotFound(String),

    /// Waste report with the given ID was not found.
    #[error("report not found: {0}")]
    ReportNotFound(String),

    /// Cleanup activity with the given ID was not found.
    #[error("activity not found: {0}")]
    ActivityNotFound(String),

    /// Note with the given ID was not found.
    #[error("note not found: {0}")]
    NoteNotFound(String),

    /// Status update that would move a report backwards.
    #[error("report status cannot move from {from} to {to}")]
    StatusRegression {
        /// Current status.
        from: ReportStatus,
        /// Requested status.
        to: ReportStatus,
    },

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::Validation(_) => 1002,
            Self::ReportNotFound(_) => 2001,
            Self::ActivityNotFound(_) => 2002,
            Self::NoteNotFound(_) => 2003,
            Self::UserNotFound(_) => 2004,
            Self::StatusRegression { .. } => 2101,
            Self::EmailTaken(_) => 2102,
            Self::Internal(_) => 3000,
            Self::Unauthorized => 4001,
            Self::InvalidCredentials => 4002,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::ReportNotFound(_)
            | Self::ActivityNotFound(_)
            | Self::NoteNotFound(_)
            | Self::UserNotFound(_) => StatusCode::NOT_FOUND,
            Self::StatusRegression { .. } | Self::EmailTaken(_) => StatusCode::CONFLICT,
            Self::Unauthorized | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_bad_request() {
        let err = ServerError::from(ValidationError::MissingLocation);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), 1002);
    }

    #[test]
    fn regression_is_a_conflict() {
        let err = ServerError::StatusRegression {
            from: ReportStatus::Completed,
            to: ReportStatus::Pending,
        };
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            err.to_string(),
            "report status cannot move from completed to pending"
        );
    }

    #[test]
    fn auth_failures_are_unauthorized() {
        assert_eq!(
            ServerError::Unauthorized.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ServerError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn response_carries_status() {
        let response = ServerError::NoteNotFound("n1".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
