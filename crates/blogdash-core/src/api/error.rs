use std::time::Duration;

use thiserror::Error;

use crate::auth::SlotError;

/// Authentication-layer failures. These are handled once, by the shell,
/// as a navigation back to the login entry point.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Session expired")]
    SessionExpired,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthFailure),

    #[error("Request failed ({status}): {detail}")]
    Api { status: u16, detail: String },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session storage failed: {0}")]
    Session(#[from] SlotError),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    /// Build a business error from a non-success response body.
    /// Prefers the backend's `{"detail": "..."}` message when present.
    pub fn from_status(status: u16, body: &str) -> Self {
        let detail = Self::detail(body).unwrap_or_else(|| Self::truncate_body(body));
        ApiError::Api { status, detail }
    }

    /// The `detail` message of a backend error body, if it has one.
    pub(crate) fn detail(body: &str) -> Option<String> {
        serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("detail")?.as_str().map(str::to_string))
            .filter(|d| !d.is_empty())
    }

    pub fn auth_failure(&self) -> Option<AuthFailure> {
        match self {
            ApiError::Auth(failure) => Some(*failure),
            _ => None,
        }
    }

    pub fn is_auth_failure(&self) -> bool {
        self.auth_failure().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_prefers_detail() {
        let err = ApiError::from_status(409, r#"{"detail":"Category already exists"}"#);
        match err {
            ApiError::Api { status, detail } => {
                assert_eq!(status, 409);
                assert_eq!(detail, "Category already exists");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_from_status_falls_back_to_truncated_body() {
        let body = "x".repeat(600);
        match ApiError::from_status(500, &body) {
            ApiError::Api { detail, .. } => {
                assert!(detail.starts_with(&"x".repeat(500)));
                assert!(detail.ends_with("(truncated, 600 total bytes)"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let body = "é".repeat(300);
        let truncated = ApiError::truncate_body(&body);
        assert!(truncated.contains("truncated, 600 total bytes"));
    }

    #[test]
    fn test_auth_failure_tag() {
        let err: ApiError = AuthFailure::SessionExpired.into();
        assert_eq!(err.auth_failure(), Some(AuthFailure::SessionExpired));
        assert!(!ApiError::Validation("x".into()).is_auth_failure());
        assert_eq!(err.to_string(), "Session expired");
    }
}
