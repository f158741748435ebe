//! Routing of verified webhook events to registered handlers.

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use serde::de::DeserializeOwned;

use crate::error::{HandlerError, WebhookError, WebhookResult};
use crate::event::{events, CustomerEvent, OrderEvent, ProductEvent, TypedEvent, WebhookEvent};

type InvokeFuture = Pin<Box<dyn Future<Output = WebhookResult<()>> + Send>>;
type Invoke = Box<dyn Fn(WebhookEvent) -> InvokeFuture + Send + Sync>;

/// Trait for handlers that receive the generic envelope.
#[async_trait]
pub trait WebhookHandler: Send + Sync {
    /// Handles an event.
    async fn handle(&self, event: WebhookEvent) -> Result<(), HandlerError>;
}

/// Wrapper for function-based handlers.
pub struct FnHandler<F> {
    handler: F,
}

impl<F> FnHandler<F> {
    /// Creates a new function handler.
    pub fn new(handler: F) -> Self {
        Self { handler }
    }
}

#[async_trait]
impl<F, Fut> WebhookHandler for FnHandler<F>
where
    F: Fn(WebhookEvent) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    async fn handle(&self, event: WebhookEvent) -> Result<(), HandlerError> {
        (self.handler)(event).await
    }
}

/// How the builder resolves two registrations for the same event type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// The later registration wins.
    #[default]
    Replace,
    /// The earlier registration wins.
    KeepFirst,
    /// `build()` fails with [`WebhookError::DuplicateHandler`].
    Reject,
}

/// What a registered handler receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerKind {
    /// The raw envelope.
    Generic,
    /// The envelope with its payload decoded into the named type.
    Typed { payload_type: &'static str },
}

/// Result of a successful dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A handler ran and succeeded.
    Handled,
    /// No handler is registered for the event type.
    Unhandled,
}

struct Registration {
    kind: HandlerKind,
    invoke: Invoke,
}

/// Builder for [`WebhookDispatcher`].
#[derive(Default)]
pub struct WebhookDispatcherBuilder {
    registrations: Vec<(String, Registration)>,
    policy: DuplicatePolicy,
}

impl WebhookDispatcherBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how duplicate registrations are resolved.
    pub fn duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Registers a handler that receives the raw envelope.
    pub fn on<F, Fut>(self, event_type: impl Into<String>, handler: F) -> Self
    where
        F: Fn(WebhookEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        self.on_handler(event_type, FnHandler::new(handler))
    }

    /// Registers a [`WebhookHandler`] implementation.
    pub fn on_handler(
        mut self,
        event_type: impl Into<String>,
        handler: impl WebhookHandler + 'static,
    ) -> Self {
        let handler: Arc<dyn WebhookHandler> = Arc::new(handler);
        let invoke: Invoke = Box::new(move |event| {
            let handler = Arc::clone(&handler);
            Box::pin(async move {
                let tag = event.event.clone();
                handler
                    .handle(event)
                    .await
                    .map_err(|source| WebhookError::HandlerExecution { event: tag, source })
            })
        });

        self.registrations.push((
            event_type.into(),
            Registration {
                kind: HandlerKind::Generic,
                invoke,
            },
        ));
        self
    }

    /// Registers a handler that receives the payload decoded into `T`.
    ///
    /// If the payload does not decode, dispatch fails with
    /// [`WebhookError::SchemaMismatch`] and the handler is not called.
    pub fn on_typed<T, F, Fut>(mut self, event_type: impl Into<String>, handler: F) -> Self
    where
        T: DeserializeOwned + Send + 'static,
        F: Fn(TypedEvent<T>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        let handler = Arc::new(handler);
        let invoke: Invoke = Box::new(move |event| {
            let handler = Arc::clone(&handler);
            Box::pin(async move {
                let tag = event.event.clone();
                let typed = TypedEvent::<T>::from_envelope(event)?;
                handler(typed)
                    .await
                    .map_err(|source| WebhookError::HandlerExecution { event: tag, source })
            })
        });

        self.registrations.push((
            event_type.into(),
            Registration {
                kind: HandlerKind::Typed {
                    payload_type: std::any::type_name::<T>(),
                },
                invoke,
            },
        ));
        self
    }

    /// Registers a handler for `product.created`.
    pub fn on_product_created<F, Fut>(self, handler: F) -> Self
    where
        F: Fn(ProductEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        self.on_typed(events::PRODUCT_CREATED, handler)
    }

    /// Registers a handler for `order.created`.
    pub fn on_order_created<F, Fut>(self, handler: F) -> Self
    where
        F: Fn(OrderEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        self.on_typed(events::ORDER_CREATED, handler)
    }

    /// Registers a handler for `customer.created`.
    pub fn on_customer_created<F, Fut>(self, handler: F) -> Self
    where
        F: Fn(CustomerEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        self.on_typed(events::CUSTOMER_CREATED, handler)
    }

    /// Freezes the registrations into a dispatcher.
    pub fn build(self) -> WebhookResult<WebhookDispatcher> {
        let mut handlers: HashMap<String, Registration> = HashMap::new();

        for (event_type, registration) in self.registrations {
            if !handlers.contains_key(&event_type) {
                handlers.insert(event_type, registration);
                continue;
            }

            match self.policy {
                DuplicatePolicy::Replace => {
                    tracing::debug!(event = %event_type, "Replacing webhook handler");
                    handlers.insert(event_type, registration);
                }
                DuplicatePolicy::KeepFirst => {
                    tracing::debug!(event = %event_type, "Ignoring duplicate webhook handler");
                }
                DuplicatePolicy::Reject => {
                    return Err(WebhookError::DuplicateHandler(event_type));
                }
            }
        }

        Ok(WebhookDispatcher { handlers })
    }
}

/// Routes webhook events to the handler registered for their type.
///
/// Registrations are fixed at [`build`](WebhookDispatcherBuilder::build)
/// time; share a built dispatcher across tasks with an `Arc`.
///
/// # Example
///
/// ```rust
/// use salla_webhooks::{DispatchOutcome, HandlerError, ProductEvent, WebhookDispatcher};
///
/// # async fn example() -> salla_webhooks::WebhookResult<()> {
/// let dispatcher = WebhookDispatcher::builder()
///     .on_product_created(|event: ProductEvent| async move {
///         println!("new product {}", event.data.name);
///         Ok::<_, HandlerError>(())
///     })
///     .build()?;
///
/// let body = br#"{"event":"product.created","data":{"id":1,"name":"Test"}}"#;
/// assert_eq!(dispatcher.dispatch(body).await?, DispatchOutcome::Handled);
/// # Ok(())
/// # }
/// ```
pub struct WebhookDispatcher {
    handlers: HashMap<String, Registration>,
}

impl WebhookDispatcher {
    /// Starts building a dispatcher.
    pub fn builder() -> WebhookDispatcherBuilder {
        WebhookDispatcherBuilder::new()
    }

    /// Returns the kind of handler registered for `event_type`.
    pub fn handler_kind(&self, event_type: &str) -> Option<&HandlerKind> {
        self.handlers.get(event_type).map(|r| &r.kind)
    }

    /// Returns true if a handler is registered for `event_type`.
    pub fn has_handler(&self, event_type: &str) -> bool {
        self.handlers.contains_key(event_type)
    }

    /// Registered event types.
    pub fn event_types(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    /// Parses the raw body and dispatches it.
    pub async fn dispatch(&self, payload: &[u8]) -> WebhookResult<DispatchOutcome> {
        let event = WebhookEvent::parse(payload)?;
        self.dispatch_event(event).await
    }

    /// Dispatches an already parsed envelope.
    ///
    /// A panicking handler is reported as [`WebhookError::HandlerExecution`].
    pub async fn dispatch_event(&self, event: WebhookEvent) -> WebhookResult<DispatchOutcome> {
        let Some(registration) = self.handlers.get(&event.event) else {
            tracing::debug!(event = %event.event, "No handler registered for webhook event");
            return Ok(DispatchOutcome::Unhandled);
        };

        let tag = event.event.clone();
        let result = AssertUnwindSafe(async { (registration.invoke)(event).await })
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| {
                Err(WebhookError::HandlerExecution {
                    event: tag.clone(),
                    source: format!("handler panicked: {}", panic_message(panic.as_ref())).into(),
                })
            });

        match result {
            Ok(()) => {
                tracing::debug!(event = %tag, "Webhook event handled");
                Ok(DispatchOutcome::Handled)
            }
            Err(e) => {
                tracing::error!(event = %tag, error = %e, "Webhook handler failed");
                Err(e)
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}

impl std::fmt::Debug for WebhookDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.handlers.iter().map(|(k, v)| (k, &v.kind)))
            .finish()
    }
}
