//! # Salla Axum Integration
//!
//! Mounts a [`WebhookReceiver`](salla_webhooks::WebhookReceiver) as an Axum
//! route and maps its outcome to HTTP status codes:
//!
//! | Outcome | Status |
//! |---|---|
//! | handled, or no handler registered | 200 |
//! | malformed envelope | 400 |
//! | bad signature | 401 |
//! | handler failure or schema mismatch | 500 |
//! | method other than POST | 405 |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use axum::Router;
//! use salla_axum::webhook_routes;
//!
//! let app: Router = Router::new().merge(webhook_routes(receiver));
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! ```

mod routes;

pub use routes::{webhook_routes, webhook_routes_at, WEBHOOK_PATH};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use salla_webhooks::WebhookError;

/// Wrapper for WebhookError that implements IntoResponse.
pub struct WebhookErrorResponse(pub WebhookError);

impl IntoResponse for WebhookErrorResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = serde_json::json!({
            "error": self.0.to_string(),
            "code": self.0.status_code()
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<WebhookError> for WebhookErrorResponse {
    fn from(err: WebhookError) -> Self {
        WebhookErrorResponse(err)
    }
}
