//! # Salla Webhooks
//!
//! Receiving side of Salla webhooks:
//! - HMAC-SHA256 signature verification over the raw request body
//! - The generic event envelope and typed views of its payload
//! - A dispatcher routing each event type to one registered handler
//!
//! ## Example
//!
//! ```rust,ignore
//! use salla_webhooks::{HandlerError, OrderEvent, WebhookDispatcher, WebhookReceiver, WebhookVerifier};
//!
//! let dispatcher = WebhookDispatcher::builder()
//!     .on_order_created(|event: OrderEvent| async move {
//!         println!("order {} created", event.data.reference_id);
//!         Ok::<_, HandlerError>(())
//!     })
//!     .build()?;
//!
//! let receiver = WebhookReceiver::new(WebhookVerifier::with_secret("secret"), dispatcher);
//! let outcome = receiver.receive(Some(signature), &body).await?;
//! ```

mod dispatcher;
mod error;
mod event;
mod receiver;
mod signature;

pub use dispatcher::{
    DispatchOutcome, DuplicatePolicy, FnHandler, HandlerKind, WebhookDispatcher,
    WebhookDispatcherBuilder, WebhookHandler,
};
pub use error::{HandlerError, WebhookError, WebhookResult};
pub use event::{events, CustomerEvent, OrderEvent, ProductEvent, TypedEvent, WebhookEvent};
pub use receiver::WebhookReceiver;
pub use signature::{
    sign, signature_from_headers, WebhookVerifier, FALLBACK_SIGNATURE_HEADER, SIGNATURE_HEADER,
};
