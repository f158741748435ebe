//! Route mounting for the webhook endpoint.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use salla_webhooks::{signature_from_headers, DispatchOutcome, WebhookReceiver};

use crate::WebhookErrorResponse;

/// Default path of the webhook endpoint.
pub const WEBHOOK_PATH: &str = "/webhook";

/// Creates a router serving `POST /webhook`.
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .merge(webhook_routes(receiver))
///     .route("/health", get(|| async { "OK" }));
/// ```
pub fn webhook_routes<S>(receiver: WebhookReceiver) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    webhook_routes_at(WEBHOOK_PATH, receiver)
}

/// Creates a router serving webhooks at `path`.
pub fn webhook_routes_at<S>(path: &str, receiver: WebhookReceiver) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route(path, post(webhook_handler))
        .with_state(receiver)
}

async fn webhook_handler(
    State(receiver): State<WebhookReceiver>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = signature_from_headers(|name| {
        headers.get(name).and_then(|value| value.to_str().ok())
    });

    match receiver.receive(signature, &body).await {
        Ok(DispatchOutcome::Handled) => StatusCode::OK.into_response(),
        Ok(DispatchOutcome::Unhandled) => StatusCode::OK.into_response(),
        Err(err) => {
            tracing::info!(status = err.status_code(), error = %err, "Webhook rejected");
            WebhookErrorResponse(err).into_response()
        }
    }
}
