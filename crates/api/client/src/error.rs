//! API error types.

use salla_core::ErrorResponse;
use salla_oauth::OAuthError;
use serde_json::{Map, Value};
use thiserror::Error;

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// An error response returned by the Salla API.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Salla API error (status {status_code}){}", message_suffix(.message))]
pub struct RemoteApiError {
    pub status_code: u16,
    pub message: String,
    /// Per-field validation details, when the API sends them.
    pub field_errors: Map<String, Value>,
}

fn message_suffix(message: &str) -> String {
    if message.is_empty() {
        String::new()
    } else {
        format!(": {}", message)
    }
}

impl RemoteApiError {
    /// Builds an error from a non-2xx response.
    ///
    /// Bodies in the standard `{success, code, message, data}` shape are
    /// unpacked; anything else is kept verbatim as the message.
    pub fn from_response(status_code: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorResponse>(body) {
            Ok(response) => Self {
                status_code,
                message: response.message,
                field_errors: response.data.unwrap_or_default(),
            },
            Err(_) => Self {
                status_code,
                message: body.to_string(),
                field_errors: Map::new(),
            },
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code == 404
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status_code == 401
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status_code == 429
    }
}

/// Error type for API operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The API answered with a non-success status.
    #[error("{0}")]
    Remote(RemoteApiError),

    /// The request could not be sent or the response could not be read.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response body did not match the expected type.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The request body could not be serialized.
    #[error("Failed to serialize request: {0}")]
    Serialization(String),

    /// A credential operation failed.
    #[error("OAuth error: {0}")]
    OAuth(OAuthError),
}

impl ApiError {
    /// Returns the remote error, if this is one.
    pub fn remote(&self) -> Option<&RemoteApiError> {
        match self {
            Self::Remote(err) => Some(err),
            _ => None,
        }
    }

    /// HTTP status of a remote error.
    pub fn status_code(&self) -> Option<u16> {
        self.remote().map(|err| err.status_code)
    }

    pub fn is_not_found(&self) -> bool {
        self.remote().is_some_and(RemoteApiError::is_not_found)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.remote().is_some_and(RemoteApiError::is_unauthorized)
    }

    pub fn is_rate_limited(&self) -> bool {
        self.remote().is_some_and(RemoteApiError::is_rate_limited)
    }
}

impl From<RemoteApiError> for ApiError {
    fn from(err: RemoteApiError) -> Self {
        ApiError::Remote(err)
    }
}

impl From<OAuthError> for ApiError {
    fn from(err: OAuthError) -> Self {
        ApiError::OAuth(err)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_error_body() {
        let err = RemoteApiError::from_response(
            422,
            r#"{"success": false, "code": 422, "message": "validation failed", "data": {"name": ["required"]}}"#,
        );
        assert_eq!(err.status_code, 422);
        assert_eq!(err.message, "validation failed");
        assert_eq!(err.field_errors["name"][0], "required");
        assert_eq!(err.to_string(), "Salla API error (status 422): validation failed");
    }

    #[test]
    fn test_raw_body_becomes_message() {
        let err = RemoteApiError::from_response(502, "Bad Gateway");
        assert_eq!(err.message, "Bad Gateway");
        assert!(err.field_errors.is_empty());
    }

    #[test]
    fn test_display_without_message() {
        let err = RemoteApiError::from_response(500, "");
        assert_eq!(err.to_string(), "Salla API error (status 500)");
    }

    #[test]
    fn test_classification() {
        let cases = [
            (404, true, false, false),
            (401, false, true, false),
            (429, false, false, true),
            (500, false, false, false),
        ];
        for (status, not_found, unauthorized, rate_limited) in cases {
            let err = ApiError::from(RemoteApiError::from_response(status, "{}"));
            assert_eq!(err.is_not_found(), not_found, "status {}", status);
            assert_eq!(err.is_unauthorized(), unauthorized, "status {}", status);
            assert_eq!(err.is_rate_limited(), rate_limited, "status {}", status);
            assert_eq!(err.status_code(), Some(status));
        }
    }

    #[test]
    fn test_non_remote_errors_are_not_classified() {
        let err = ApiError::Transport("connection reset".into());
        assert!(!err.is_not_found());
        assert_eq!(err.status_code(), None);
    }
}
