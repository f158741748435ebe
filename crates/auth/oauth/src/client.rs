//! Authorization URL construction and token endpoint exchanges.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::config::OAuthConfig;
use crate::error::{OAuthError, OAuthResult};
use crate::store::TokenRefresher;
use crate::token::Token;

/// Raw token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Lifetime in seconds.
    #[serde(default)]
    pub expires_in: i64,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl TokenResponse {
    /// Converts to a [`Token`] whose expiry is measured from the local clock.
    ///
    /// Fails with [`OAuthError::InvalidResponse`] when `expires_in` puts the
    /// expiry outside the representable range.
    pub fn into_token(self) -> OAuthResult<Token> {
        let expiry = Duration::try_seconds(self.expires_in)
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
            .ok_or_else(|| {
                OAuthError::InvalidResponse(format!("expires_in out of range: {}", self.expires_in))
            })?;

        Ok(Token {
            access_token: self.access_token,
            refresh_token: self.refresh_token.unwrap_or_default(),
            token_type: self.token_type,
            expiry,
        })
    }
}

/// OAuth 2.0 client for the Salla authorization server.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    config: OAuthConfig,
    authorization_url: Url,
    token_url: Url,
    http_client: Client,
}

impl OAuthClient {
    /// Creates a client, validating the configured endpoints.
    pub fn new(config: OAuthConfig) -> OAuthResult<Self> {
        let authorization_url = Url::parse(&config.endpoints.authorization_url).map_err(|e| {
            OAuthError::InvalidConfig(format!("authorization_url: {}", e))
        })?;
        let token_url = Url::parse(&config.endpoints.token_url)
            .map_err(|e| OAuthError::InvalidConfig(format!("token_url: {}", e)))?;

        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| OAuthError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            config,
            authorization_url,
            token_url,
            http_client,
        })
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    /// Generates a random `state` value for CSRF protection.
    pub fn generate_state() -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }

    /// Builds the URL the merchant is sent to in order to authorize the app.
    ///
    /// Parameters are emitted in key order so the result is deterministic.
    pub fn authorization_url(&self, state: &str) -> String {
        let mut url = self.authorization_url.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", &self.config.scope_string())
            .append_pair("state", state);
        url.into()
    }

    /// Exchanges an authorization code for a token.
    pub async fn exchange_code(&self, code: &str) -> OAuthResult<Token> {
        let scope = self.config.scope_string();
        self.request_token(&[
            ("grant_type", "authorization_code"),
            ("client_id", &self.config.client_id),
            ("client_secret", &self.config.client_secret),
            ("code", code),
            ("redirect_uri", &self.config.redirect_uri),
            ("scope", &scope),
        ])
        .await
    }

    /// Trades a refresh token for a new token.
    pub async fn refresh_token(&self, refresh_token: &str) -> OAuthResult<Token> {
        let scope = self.config.scope_string();
        self.request_token(&[
            ("grant_type", "refresh_token"),
            ("client_id", &self.config.client_id),
            ("client_secret", &self.config.client_secret),
            ("refresh_token", refresh_token),
            ("scope", &scope),
        ])
        .await
    }

    async fn request_token(&self, params: &[(&str, &str)]) -> OAuthResult<Token> {
        let grant_type = params
            .iter()
            .find(|(key, _)| *key == "grant_type")
            .map(|(_, value)| *value)
            .unwrap_or_default();
        tracing::debug!(grant_type, "Requesting token");

        let response = self
            .http_client
            .post(self.token_url.clone())
            .header("Accept", "application/json")
            .form(params)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(grant_type, status = status.as_u16(), "Token request rejected");
            return Err(OAuthError::TokenExchange {
                status_code: status.as_u16(),
                body,
            });
        }

        let token_response: TokenResponse = serde_json::from_str(&body)?;
        token_response.into_token()
    }
}

#[async_trait]
impl TokenRefresher for OAuthClient {
    async fn refresh(&self, refresh_token: &str) -> OAuthResult<Token> {
        self.refresh_token(refresh_token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OAuthEndpoints;

    fn client() -> OAuthClient {
        OAuthClient::new(
            OAuthConfig::new("client_id", "client_secret")
                .redirect_uri("https://example.com/oauth/callback"),
        )
        .unwrap()
    }

    #[test]
    fn test_authorization_url_default_scope() {
        let url = client().authorization_url("test_state");
        assert_eq!(
            url,
            "https://accounts.salla.sa/oauth2/auth?client_id=client_id\
             &redirect_uri=https%3A%2F%2Fexample.com%2Foauth%2Fcallback\
             &response_type=code&scope=offline_access&state=test_state"
        );
    }

    #[test]
    fn test_authorization_url_joins_scopes() {
        let client = OAuthClient::new(
            OAuthConfig::new("id", "secret").scopes(["offline_access", "orders.read"]),
        )
        .unwrap();
        let url = client.authorization_url("s");
        assert!(url.contains("scope=offline_access+orders.read"));
    }

    #[test]
    fn test_authorization_url_is_deterministic() {
        let client = client();
        assert_eq!(client.authorization_url("abc"), client.authorization_url("abc"));
    }

    #[test]
    fn test_invalid_endpoint_is_rejected() {
        let result = OAuthClient::new(OAuthConfig::new("id", "secret").endpoints(OAuthEndpoints {
            authorization_url: "not a url".to_string(),
            token_url: crate::config::TOKEN_URL.to_string(),
        }));
        assert!(matches!(result, Err(OAuthError::InvalidConfig(_))));
    }

    #[test]
    fn test_generate_state_is_unique() {
        let a = OAuthClient::generate_state();
        let b = OAuthClient::generate_state();
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
    }

    #[test]
    fn test_token_response_defaults() {
        let resp: TokenResponse =
            serde_json::from_str(r#"{"access_token": "abc", "expires_in": 3600}"#).unwrap();
        let token = resp.into_token().unwrap();
        assert_eq!(token.token_type, "Bearer");
        assert!(token.refresh_token.is_empty());
        assert!(token.is_valid());
    }

    #[test]
    fn test_token_response_rejects_unrepresentable_expiry() {
        for expires_in in [10_000_000_000_000, i64::MAX, i64::MIN] {
            let resp = TokenResponse {
                access_token: "abc".to_string(),
                token_type: "Bearer".to_string(),
                expires_in,
                refresh_token: None,
                scope: None,
            };
            assert!(matches!(resp.into_token(), Err(OAuthError::InvalidResponse(_))));
        }
    }
}
