//! Shared error types and FastAPI error-body parsing.

use serde::Deserialize;
use thiserror::Error;

const GENERIC_MESSAGE: &str = "Something went wrong. Please try again.";

/// FastAPI error envelope: `{"detail": "..."}` or, for request validation
/// failures, `{"detail": [{"loc": [...], "msg": "...", "type": "..."}]}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Detail,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Detail {
    Text(String),
    Validation(Vec<ValidationIssue>),
    Other(serde_json::Value),
}

#[derive(Debug, Deserialize)]
struct ValidationIssue {
    msg: String,
}

/// Extract a user-facing message from a backend error body.
/// Prefers a string `detail`, then the first validation message.
pub fn try_error_detail(body: &str) -> Option<String> {
    let parsed = serde_json::from_str::<ErrorBody>(body).ok()?;
    let message = match parsed.detail {
        Detail::Text(text) => text,
        Detail::Validation(issues) => issues.into_iter().next()?.msg,
        Detail::Other(_) => return None,
    };
    let trimmed = message.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// API error type for client-side use
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("Deserialization error: {0}")]
    Deserialize(String),
    /// The session is gone: no token, or the refresh attempt failed.
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Storage error: {0}")]
    Storage(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Unauthorized => Some(401),
            _ => None,
        }
    }

    /// Text suitable for a toast.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Http { body, .. } => {
                try_error_detail(body).unwrap_or_else(|| GENERIC_MESSAGE.to_string())
            }
            ApiError::Network(_) => "Could not reach the server.".to_string(),
            ApiError::Unauthorized => "Your session has expired. Please log in again.".to_string(),
            ApiError::Deserialize(_) | ApiError::Storage(_) => GENERIC_MESSAGE.to_string(),
        }
    }
}

/// Local persistence failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("storage unavailable")]
    Unavailable,
    #[error("failed to encode value: {0}")]
    Encode(String),
    #[error("io error: {0}")]
    Io(String),
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(r#"{"detail":"Spaces already held"}"#, Some("Spaces already held"))]
    #[case(
        r#"{"detail":[{"loc":["body","email"],"msg":"value is not a valid email address","type":"value_error"}]}"#,
        Some("value is not a valid email address")
    )]
    #[case(r#"{"detail":"   "}"#, None)]
    #[case(r#"{"detail":{"code":7}}"#, None)]
    #[case("<html>502</html>", None)]
    fn detail_extraction(#[case] body: &str, #[case] expected: Option<&str>) {
        assert_eq!(try_error_detail(body).as_deref(), expected);
    }

    #[test]
    fn user_message_falls_back_to_generic_text() {
        let err = ApiError::Http {
            status: 500,
            body: "Internal Server Error".into(),
        };
        assert_eq!(err.user_message(), GENERIC_MESSAGE);
        assert_eq!(err.status(), Some(500));

        let err = ApiError::Http {
            status: 409,
            body: r#"{"detail":"Space 4 is no longer available"}"#.into(),
        };
        assert_eq!(err.user_message(), "Space 4 is no longer available");
    }

    #[test]
    fn storage_errors_convert() {
        let err: ApiError = StorageError::Unavailable.into();
        assert_eq!(err, ApiError::Storage("storage unavailable".into()));
    }
}
