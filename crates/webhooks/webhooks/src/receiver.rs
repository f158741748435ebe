//! Signature verification followed by dispatch.

use std::sync::Arc;

use crate::dispatcher::{DispatchOutcome, WebhookDispatcher};
use crate::error::{WebhookError, WebhookResult};
use crate::signature::WebhookVerifier;

/// Verifies incoming webhooks and hands them to a dispatcher.
///
/// Cloning is cheap; clones share the dispatcher.
#[derive(Debug, Clone)]
pub struct WebhookReceiver {
    verifier: WebhookVerifier,
    dispatcher: Arc<WebhookDispatcher>,
}

impl WebhookReceiver {
    /// Creates a new webhook receiver.
    pub fn new(verifier: WebhookVerifier, dispatcher: impl Into<Arc<WebhookDispatcher>>) -> Self {
        Self {
            verifier,
            dispatcher: dispatcher.into(),
        }
    }

    /// Returns the verifier.
    pub fn verifier(&self) -> &WebhookVerifier {
        &self.verifier
    }

    /// Returns the dispatcher.
    pub fn dispatcher(&self) -> &Arc<WebhookDispatcher> {
        &self.dispatcher
    }

    /// Verifies the signature over the raw body, then dispatches it.
    ///
    /// A missing signature is checked as an empty string, so it only passes
    /// in open mode.
    pub async fn receive(
        &self,
        signature: Option<&str>,
        payload: &[u8],
    ) -> WebhookResult<DispatchOutcome> {
        if !self.verifier.verify(payload, signature.unwrap_or_default()) {
            tracing::warn!("Rejected webhook with invalid signature");
            return Err(WebhookError::SignatureInvalid);
        }

        self.dispatcher.dispatch(payload).await
    }
}
