//! Thread-safe credential holder with single-flight refresh.

use async_trait::async_trait;
use chrono::Duration;
use tokio::sync::RwLock;

use crate::error::{OAuthError, OAuthResult};
use crate::token::Token;

/// How long before expiry a token is proactively refreshed.
pub const DEFAULT_REFRESH_MARGIN_SECS: i64 = 5 * 60;

/// Something that can trade a refresh token for a new access token.
///
/// Implemented by [`OAuthClient`](crate::OAuthClient).
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    /// Exchanges `refresh_token` for a fresh token.
    async fn refresh(&self, refresh_token: &str) -> OAuthResult<Token>;
}

/// Owns the current credential.
///
/// Reads take a shared lock. [`ensure_valid`](Self::ensure_valid) takes the
/// exclusive lock for the whole refresh call, so concurrent callers wait for a
/// single in-flight refresh instead of issuing their own, and nobody ever sees
/// a half-updated token.
///
/// # Example
///
/// ```rust,ignore
/// let store = TokenStore::new(Some(saved_token));
/// let token = store.ensure_valid(&oauth_client).await?;
/// persist(&token);
/// ```
pub struct TokenStore {
    token: RwLock<Option<Token>>,
    refresh_margin: Duration,
}

impl TokenStore {
    /// Creates a store holding `token`.
    pub fn new(token: Option<Token>) -> Self {
        Self {
            token: RwLock::new(token),
            refresh_margin: Duration::seconds(DEFAULT_REFRESH_MARGIN_SECS),
        }
    }

    /// Creates an empty store.
    pub fn empty() -> Self {
        Self::new(None)
    }

    /// Sets how long before expiry a refresh is triggered.
    pub fn with_refresh_margin(mut self, margin: Duration) -> Self {
        self.refresh_margin = margin;
        self
    }

    /// Returns the refresh margin.
    pub fn refresh_margin(&self) -> Duration {
        self.refresh_margin
    }

    /// Returns a snapshot of the current token.
    pub async fn get(&self) -> Option<Token> {
        self.token.read().await.clone()
    }

    /// Replaces the current token.
    pub async fn set(&self, token: Token) {
        *self.token.write().await = Some(token);
    }

    /// Drops the current token.
    pub async fn clear(&self) {
        *self.token.write().await = None;
    }

    /// Makes sure the stored token is usable for at least the refresh margin.
    ///
    /// Refreshes through `refresher` while holding the write lock when the
    /// token is missing, empty, expired or about to expire. On failure the
    /// previous token is kept and the error is returned.
    ///
    /// # Errors
    ///
    /// [`OAuthError::CredentialExhausted`] when a refresh is needed but no
    /// refresh token is stored, or whatever error the refresher returns.
    pub async fn ensure_valid<R>(&self, refresher: &R) -> OAuthResult<Token>
    where
        R: TokenRefresher + ?Sized,
    {
        let mut guard = self.token.write().await;

        let refresh_token = match guard.as_ref() {
            Some(token) if !token.needs_refresh(self.refresh_margin) => return Ok(token.clone()),
            Some(token) if token.has_refresh_token() => token.refresh_token.clone(),
            _ => return Err(OAuthError::CredentialExhausted),
        };

        tracing::debug!("Access token missing or close to expiry, refreshing");

        match refresher.refresh(&refresh_token).await {
            Ok(mut fresh) => {
                // Some servers only rotate the access token.
                if fresh.refresh_token.is_empty() {
                    fresh.refresh_token = refresh_token;
                }
                tracing::info!(expiry = %fresh.expiry, "Access token refreshed");
                *guard = Some(fresh.clone());
                Ok(fresh)
            }
            Err(err) => {
                tracing::warn!("Access token refresh failed: {}", err);
                Err(err)
            }
        }
    }
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore")
            .field("refresh_margin", &self.refresh_margin)
            .finish_non_exhaustive()
    }
}
