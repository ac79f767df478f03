//! Client-side request errors.

use reqwest::StatusCode;
use serde_json::Value;

/// Why a request through [`super::ApiClient`] failed.
///
/// `Clone` so that every caller joined onto one de-duplicated request
/// receives the same outcome.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request could not be sent or the response not read.
    #[error("network error: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status {
        /// Numeric HTTP status.
        status: u16,
        /// Best-effort message extracted from the response.
        message: String,
    },

    /// The request body or headers could not be encoded.
    #[error("could not encode request: {0}")]
    Encode(String),

    /// The response body was not the expected JSON.
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// HTTP status of a [`ApiError::Status`] failure.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// `true` for a 401 answer, i.e. an invalid or expired session.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401))
    }
}

/// Extracts a human-readable message from an error response.
///
/// Looks for `error.message`, `error` as a string, then `message`; falls
/// back to the status' canonical reason and finally to a generic text.
pub(crate) fn error_message(status: StatusCode, body: &[u8]) -> String {
    let from_body = serde_json::from_slice::<Value>(body).ok().and_then(|json| {
        let error = json.get("error");
        error
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
            .or_else(|| error.and_then(Value::as_str))
            .or_else(|| json.get("message").and_then(Value::as_str))
            .map(ToString::to_string)
    });

    from_body
        .or_else(|| status.canonical_reason().map(ToString::to_string))
        .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn reads_structured_error_body() {
        let body = br#"{"error":{"code":4001,"message":"session expired"}}"#;
        assert_eq!(
            error_message(StatusCode::UNAUTHORIZED, body),
            "session expired"
        );
    }

    #[test]
    fn reads_plain_error_string() {
        let body = br#"{"error":"Report not found"}"#;
        assert_eq!(error_message(StatusCode::NOT_FOUND, body), "Report not found");
    }

    #[test]
    fn falls_back_to_status_text() {
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, b"<html>oops</html>"),
            "Bad Gateway"
        );
    }

    #[test]
    fn falls_back_to_generic_text_for_unknown_status() {
        let Ok(status) = StatusCode::from_u16(599) else {
            panic!("valid status code");
        };
        assert_eq!(error_message(status, b""), "HTTP error! status: 599");
    }

    #[test]
    fn unauthorized_display_mentions_status() {
        let err = ApiError::Status {
            status: 401,
            message: "unauthorized".to_string(),
        };
        assert!(err.is_unauthorized());
        assert!(err.to_string().contains("401"));
        assert!(!ApiError::Transport("refused".to_string()).is_unauthorized());
    }
}
