//! OAuth error types.

use thiserror::Error;

/// Result type for OAuth operations.
pub type OAuthResult<T> = Result<T, OAuthError>;

/// Error type for OAuth operations.
#[derive(Debug, Error)]
pub enum OAuthError {
    /// No refresh token is available; the merchant must re-authorize the app.
    #[error("Credential exhausted: no refresh token available, re-authorization required")]
    CredentialExhausted,

    /// The token endpoint answered with a non-success status.
    #[error("Token exchange failed with status {status_code}: {body}")]
    TokenExchange { status_code: u16, body: String },

    /// The token endpoint could not be reached or timed out.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The token endpoint answered 2xx with a body we could not parse.
    #[error("Invalid token response: {0}")]
    InvalidResponse(String),

    /// The OAuth configuration is unusable.
    #[error("Invalid OAuth configuration: {0}")]
    InvalidConfig(String),
}

impl OAuthError {
    /// Returns true if recovering requires running the authorization flow again.
    pub fn requires_reauthorization(&self) -> bool {
        match self {
            Self::CredentialExhausted => true,
            // invalid_grant and friends come back as 400/401
            Self::TokenExchange { status_code, .. } => matches!(status_code, 400 | 401),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for OAuthError {
    fn from(err: reqwest::Error) -> Self {
        OAuthError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for OAuthError {
    fn from(err: serde_json::Error) -> Self {
        OAuthError::InvalidResponse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OAuthError::TokenExchange {
            status_code: 400,
            body: "invalid_grant".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Token exchange failed with status 400: invalid_grant"
        );
    }

    #[test]
    fn test_requires_reauthorization() {
        assert!(OAuthError::CredentialExhausted.requires_reauthorization());
        assert!(OAuthError::TokenExchange {
            status_code: 401,
            body: String::new()
        }
        .requires_reauthorization());
        assert!(!OAuthError::TokenExchange {
            status_code: 503,
            body: String::new()
        }
        .requires_reauthorization());
        assert!(!OAuthError::Transport("timeout".into()).requires_reauthorization());
    }
}
