//! HMAC signature generation and verification.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Primary header carrying the webhook signature.
pub const SIGNATURE_HEADER: &str = "X-Signature";

/// Header consulted when [`SIGNATURE_HEADER`] is absent or empty.
pub const FALLBACK_SIGNATURE_HEADER: &str = "Authorization";

/// Computes the lowercase hex HMAC-SHA256 of `payload` keyed by `secret`.
pub fn sign(secret: &str, payload: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Picks the signature value out of request headers.
///
/// `lookup` is called with a header name and returns its value, if present.
pub fn signature_from_headers<'a, F>(lookup: F) -> Option<&'a str>
where
    F: Fn(&str) -> Option<&'a str>,
{
    lookup(SIGNATURE_HEADER)
        .filter(|value| !value.is_empty())
        .or_else(|| lookup(FALLBACK_SIGNATURE_HEADER))
}

/// Verifies webhook signatures against a shared secret.
///
/// A verifier without a secret runs in open mode and accepts every
/// signature. Open mode is only meant for local development.
#[derive(Clone)]
pub struct WebhookVerifier {
    secret: Option<String>,
}

impl WebhookVerifier {
    /// Creates a verifier. `None` or an empty secret selects open mode.
    pub fn new(secret: Option<impl Into<String>>) -> Self {
        let secret = secret.map(Into::into).filter(|s| !s.is_empty());
        if secret.is_none() {
            tracing::warn!("No webhook secret configured, signature verification is disabled");
        }
        Self { secret }
    }

    /// Creates a verifier with a secret.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self::new(Some(secret))
    }

    /// Creates a verifier that accepts every signature.
    pub fn open() -> Self {
        Self::new(None::<String>)
    }

    /// Returns true when no secret is configured.
    pub fn is_open(&self) -> bool {
        self.secret.is_none()
    }

    /// Checks `signature` against the HMAC of the raw `payload` bytes.
    pub fn verify(&self, payload: &[u8], signature: &str) -> bool {
        match &self.secret {
            None => true,
            Some(secret) => {
                let expected = sign(secret, payload);
                expected.as_bytes().ct_eq(signature.as_bytes()).into()
            }
        }
    }
}

impl std::fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookVerifier")
            .field("open", &self.is_open())
            .finish()
    }
}
