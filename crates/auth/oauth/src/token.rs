//! The bearer credential and its validity rules.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// An OAuth 2.0 access token with absolute expiry tracking.
///
/// Tokens are replaced as a whole, never patched field by field. They are
/// serializable so the host application can persist them between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub expiry: DateTime<Utc>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl Token {
    /// Creates a bearer token.
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expiry: DateTime<Utc>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            token_type: default_token_type(),
            expiry,
        }
    }

    /// Creates a token expiring `lifetime_secs` from now.
    pub fn expiring_in(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        lifetime_secs: i64,
    ) -> Self {
        Self::new(
            access_token,
            refresh_token,
            Utc::now() + Duration::seconds(lifetime_secs),
        )
    }

    /// A token is valid while it has an access token and has not expired.
    pub fn is_valid(&self) -> bool {
        !self.access_token.is_empty() && Utc::now() < self.expiry
    }

    /// Returns true if the token is unusable now or will expire within `margin`.
    pub fn needs_refresh(&self, margin: Duration) -> bool {
        self.access_token.is_empty() || Utc::now() + margin >= self.expiry
    }

    /// Returns true if a refresh token is available.
    pub fn has_refresh_token(&self) -> bool {
        !self.refresh_token.is_empty()
    }

    /// Value for the `Authorization` header, or `None` when there is no access token.
    pub fn authorization_header(&self) -> Option<String> {
        (!self.access_token.is_empty()).then(|| format!("Bearer {}", self.access_token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_future_expiry_is_valid() {
        for secs in [1, 60, 3600, 86_400 * 30] {
            assert!(Token::expiring_in("access", "", secs).is_valid());
        }
    }

    #[test]
    fn test_past_expiry_is_invalid() {
        for secs in [-1, -60, -3600] {
            assert!(!Token::expiring_in("access", "refresh", secs).is_valid());
        }
    }

    #[test]
    fn test_empty_access_token_is_invalid() {
        assert!(!Token::expiring_in("", "refresh", 3600).is_valid());
    }

    #[test]
    fn test_needs_refresh_inside_margin() {
        let margin = Duration::minutes(5);
        assert!(Token::expiring_in("a", "r", 60).needs_refresh(margin));
        assert!(!Token::expiring_in("a", "r", 3600).needs_refresh(margin));
        assert!(Token::expiring_in("", "r", 3600).needs_refresh(margin));
    }

    #[test]
    fn test_authorization_header() {
        let token = Token::expiring_in("abc", "", 60);
        assert_eq!(token.authorization_header().as_deref(), Some("Bearer abc"));
        assert_eq!(Token::expiring_in("", "", 60).authorization_header(), None);
    }

    #[test]
    fn test_token_persistence_format() {
        let token = Token::expiring_in("abc", "def", 60);
        let json = serde_json::to_string(&token).unwrap();
        let restored: Token = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, token);
    }
}
