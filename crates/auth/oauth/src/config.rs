//! OAuth application configuration.

use std::time::Duration;

/// Default authorization endpoint.
pub const AUTHORIZATION_URL: &str = "https://accounts.salla.sa/oauth2/auth";

/// Default token endpoint.
pub const TOKEN_URL: &str = "https://accounts.salla.sa/oauth2/token";

/// Scope requested when none are configured.
pub const DEFAULT_SCOPE: &str = "offline_access";

/// Timeout applied to token endpoint calls.
pub const TOKEN_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The authorization server endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthEndpoints {
    pub authorization_url: String,
    pub token_url: String,
}

impl Default for OAuthEndpoints {
    fn default() -> Self {
        Self {
            authorization_url: AUTHORIZATION_URL.to_string(),
            token_url: TOKEN_URL.to_string(),
        }
    }
}

/// OAuth 2.0 application credentials.
///
/// Immutable once handed to an [`OAuthClient`](crate::OAuthClient).
///
/// # Example
///
/// ```rust
/// use salla_oauth::OAuthConfig;
///
/// let config = OAuthConfig::new("client_id", "client_secret")
///     .redirect_uri("https://myapp.com/oauth/callback")
///     .scope("offline_access");
/// assert_eq!(config.scope_string(), "offline_access");
/// ```
#[derive(Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
    pub endpoints: OAuthEndpoints,
    pub timeout: Duration,
}

impl std::fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("client_id", &self.client_id)
            .field("redirect_uri", &self.redirect_uri)
            .field("scopes", &self.scopes)
            .field("endpoints", &self.endpoints)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl OAuthConfig {
    /// Creates a config with the given client credentials.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: String::new(),
            scopes: Vec::new(),
            endpoints: OAuthEndpoints::default(),
            timeout: TOKEN_REQUEST_TIMEOUT,
        }
    }

    /// Sets the redirect URI registered for the app.
    pub fn redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.redirect_uri = uri.into();
        self
    }

    /// Adds a scope.
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scopes.push(scope.into());
        self
    }

    /// Replaces the scope list.
    pub fn scopes(mut self, scopes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    /// Overrides the authorization server endpoints.
    pub fn endpoints(mut self, endpoints: OAuthEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Overrides the token endpoint timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Space-joined scopes, or [`DEFAULT_SCOPE`] when none are configured.
    pub fn scope_string(&self) -> String {
        if self.scopes.is_empty() {
            DEFAULT_SCOPE.to_string()
        } else {
            self.scopes.join(" ")
        }
    }
}
