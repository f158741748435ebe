//! # Salla OAuth
//!
//! OAuth 2.0 support for apps talking to the Salla Admin API:
//!
//! - Authorization URL construction with CSRF state
//! - Code and refresh-token exchanges against the token endpoint
//! - A [`TokenStore`] that refreshes the bearer credential before it expires,
//!   with at most one refresh in flight at a time
//!
//! Persisting tokens is left to the host application: read the current token
//! with [`TokenStore::get`] after API calls and store it wherever you like.
//!
//! ## Example
//!
//! ```rust,ignore
//! use salla_oauth::{OAuthClient, OAuthConfig, TokenStore};
//!
//! let oauth = OAuthClient::new(
//!     OAuthConfig::new("client_id", "client_secret")
//!         .redirect_uri("https://myapp.com/oauth/callback"),
//! )?;
//!
//! let state = OAuthClient::generate_state();
//! let url = oauth.authorization_url(&state);
//! // ... redirect the merchant, receive `code` on the callback ...
//! let token = oauth.exchange_code(&code).await?;
//!
//! let store = TokenStore::new(Some(token));
//! let token = store.ensure_valid(&oauth).await?;
//! ```

mod client;
mod config;
mod error;
mod store;
mod token;

pub use client::{OAuthClient, TokenResponse};
pub use config::{
    AUTHORIZATION_URL, DEFAULT_SCOPE, OAuthConfig, OAuthEndpoints, TOKEN_REQUEST_TIMEOUT, TOKEN_URL,
};
pub use error::{OAuthError, OAuthResult};
pub use store::{DEFAULT_REFRESH_MARGIN_SECS, TokenRefresher, TokenStore};
pub use token::Token;
