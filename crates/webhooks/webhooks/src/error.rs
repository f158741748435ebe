//! Webhook error types.

use thiserror::Error;

/// Error returned by a webhook handler.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for webhook operations.
pub type WebhookResult<T> = Result<T, WebhookError>;

/// Error type for webhook operations.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The request signature did not match the payload.
    #[error("Invalid signature")]
    SignatureInvalid,

    /// The body is not a valid event envelope.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// The envelope's data does not fit the shape a typed handler expects.
    #[error("Payload for {event} does not match the expected schema: {reason}")]
    SchemaMismatch { event: String, reason: String },

    /// A registered handler returned an error.
    #[error("Handler for {event} failed: {source}")]
    HandlerExecution {
        event: String,
        #[source]
        source: HandlerError,
    },

    /// More than one handler was registered for the same event type.
    #[error("Duplicate handler registered for {0}")]
    DuplicateHandler(String),
}

impl WebhookError {
    /// HTTP status code to answer the webhook sender with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::SignatureInvalid => 401,
            Self::MalformedPayload(_) => 400,
            Self::SchemaMismatch { .. } => 500,
            Self::HandlerExecution { .. } => 500,
            Self::DuplicateHandler(_) => 500,
        }
    }
}

impl From<serde_json::Error> for WebhookError {
    fn from(err: serde_json::Error) -> Self {
        WebhookError::MalformedPayload(err.to_string())
    }
}
