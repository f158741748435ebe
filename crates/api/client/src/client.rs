//! The authenticated API client.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

use salla_oauth::{OAuthClient, OAuthConfig, Token, TokenStore};

use crate::error::{ApiError, ApiResult, RemoteApiError};
use crate::resources::{BrandsService, CategoriesService, CustomersService, OrdersService, ProductsService};

/// Base URL of the Salla Admin API.
pub const DEFAULT_BASE_URL: &str = "https://api.salla.dev/admin/v2";

/// User agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("salla-rs/", env!("CARGO_PKG_VERSION"));

/// Timeout applied to API requests.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Builder for [`SallaClient`].
pub struct SallaClientBuilder {
    oauth_config: OAuthConfig,
    token: Option<Token>,
    token_store: Option<Arc<TokenStore>>,
    base_url: String,
    user_agent: String,
    timeout: Duration,
}

impl SallaClientBuilder {
    /// Creates a builder for the given OAuth application.
    pub fn new(oauth_config: OAuthConfig) -> Self {
        Self {
            oauth_config,
            token: None,
            token_store: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Seeds the client with a previously obtained token.
    pub fn token(mut self, token: Token) -> Self {
        self.token = Some(token);
        self
    }

    /// Shares an existing token store instead of creating one.
    ///
    /// Takes precedence over [`token`](Self::token).
    pub fn token_store(mut self, store: Arc<TokenStore>) -> Self {
        self.token_store = Some(store);
        self
    }

    /// Overrides the API base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Overrides the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the client.
    pub fn build(self) -> ApiResult<SallaClient> {
        let oauth = OAuthClient::new(self.oauth_config)?;
        let http_client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()?;
        let tokens = self
            .token_store
            .unwrap_or_else(|| Arc::new(TokenStore::new(self.token)));

        Ok(SallaClient {
            base_url: self.base_url.trim_end_matches('/').to_string(),
            user_agent: self.user_agent,
            http_client,
            oauth: Arc::new(oauth),
            tokens,
        })
    }
}

/// Client for the Salla Admin API.
///
/// Every request first makes sure the stored token is fresh, refreshing it
/// through the OAuth client when needed. Cloning is cheap; clones share the
/// token store.
///
/// # Example
///
/// ```rust,ignore
/// use salla_client::SallaClient;
/// use salla_oauth::{OAuthConfig, Token};
///
/// let client = SallaClient::builder(OAuthConfig::new("client_id", "client_secret"))
///     .token(saved_token)
///     .build()?;
///
/// let page = client.products().list(None).await?;
/// for product in page.items {
///     println!("{} ({})", product.name, product.sku);
/// }
///
/// // Persist the possibly refreshed token
/// save(client.token().await);
/// ```
#[derive(Clone)]
pub struct SallaClient {
    base_url: String,
    user_agent: String,
    http_client: reqwest::Client,
    oauth: Arc<OAuthClient>,
    tokens: Arc<TokenStore>,
}

impl SallaClient {
    /// Starts building a client.
    pub fn builder(oauth_config: OAuthConfig) -> SallaClientBuilder {
        SallaClientBuilder::new(oauth_config)
    }

    /// Creates a client with default settings.
    pub fn new(oauth_config: OAuthConfig, token: Option<Token>) -> ApiResult<Self> {
        let mut builder = Self::builder(oauth_config);
        builder.token = token;
        builder.build()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn oauth(&self) -> &OAuthClient {
        &self.oauth
    }

    pub fn token_store(&self) -> &Arc<TokenStore> {
        &self.tokens
    }

    /// Snapshot of the current token, for persisting.
    pub async fn token(&self) -> Option<Token> {
        self.tokens.get().await
    }

    /// Replaces the current token.
    pub async fn set_token(&self, token: Token) {
        self.tokens.set(token).await;
    }

    /// Exchanges an authorization code and stores the resulting token.
    pub async fn authorize(&self, code: &str) -> ApiResult<Token> {
        let token = self.oauth.exchange_code(code).await?;
        self.tokens.set(token.clone()).await;
        Ok(token)
    }

    /// Refreshes the token if it is close to expiry.
    pub async fn refresh_token_if_needed(&self) -> ApiResult<Token> {
        Ok(self.tokens.ensure_valid(self.oauth.as_ref()).await?)
    }

    pub fn products(&self) -> ProductsService<'_> {
        ProductsService::new(self)
    }

    pub fn orders(&self) -> OrdersService<'_> {
        OrdersService::new(self)
    }

    pub fn customers(&self) -> CustomersService<'_> {
        CustomersService::new(self)
    }

    pub fn categories(&self) -> CategoriesService<'_> {
        CategoriesService::new(self)
    }

    pub fn brands(&self) -> BrandsService<'_> {
        BrandsService::new(self)
    }

    /// Prepares a request to `path` carrying the current credential.
    ///
    /// A failed refresh is logged and the request goes out with whatever
    /// token is cached; the API then decides whether it is still accepted.
    /// The `Authorization` header is left off when there is no access token.
    pub async fn prepare_authorized_request<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ApiResult<RequestBuilder>
    where
        B: Serialize + ?Sized,
    {
        if let Err(e) = self.tokens.ensure_valid(self.oauth.as_ref()).await {
            tracing::warn!(error = %e, "Token refresh failed, continuing with cached token");
        }

        let mut request = self
            .http_client
            .request(method, format!("{}{}", self.base_url, path))
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .header(USER_AGENT, &self.user_agent);

        if let Some(header) = self
            .tokens
            .get()
            .await
            .and_then(|token| token.authorization_header())
        {
            request = request.header(AUTHORIZATION, header);
        }

        if let Some(body) = body {
            let bytes =
                serde_json::to_vec(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
            request = request.body(bytes);
        }

        Ok(request)
    }

    /// Sends the request and decodes a 2xx JSON body into `T`.
    pub async fn execute_and_decode<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> ApiResult<T> {
        let body = self.send(request).await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Sends the request, discarding a 2xx body.
    pub async fn execute(&self, request: RequestBuilder) -> ApiResult<()> {
        self.send(request).await.map(|_| ())
    }

    async fn send(&self, request: RequestBuilder) -> ApiResult<String> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let err = RemoteApiError::from_response(status.as_u16(), &body);
            tracing::debug!(status = err.status_code, message = %err.message, "API request failed");
            return Err(err.into());
        }

        Ok(body)
    }
}

impl std::fmt::Debug for SallaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SallaClient")
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let client = SallaClient::new(OAuthConfig::new("id", "secret"), None).unwrap();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
        assert!(DEFAULT_USER_AGENT.starts_with("salla-rs/"));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = SallaClient::builder(OAuthConfig::new("id", "secret"))
            .base_url("http://localhost:8080/api/")
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/api");
    }

    #[test]
    fn test_clones_share_token_store() {
        let client = SallaClient::new(OAuthConfig::new("id", "secret"), None).unwrap();
        let clone = client.clone();
        assert!(Arc::ptr_eq(client.token_store(), clone.token_store()));
    }
}
