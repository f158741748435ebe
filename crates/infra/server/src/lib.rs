//! # Salla Webhook Server
//!
//! Standalone service receiving Salla webhooks. Configuration comes from an
//! optional TOML file with environment overrides; the bundled handlers log
//! each event they receive.

mod config;

pub use config::{
    load_config, parse_config, ConfigError, ServerConfig, ENV_LOG_LEVEL, ENV_PORT,
    ENV_WEBHOOK_SECRET, HEALTH_PATH,
};

use axum::routing::get;
use axum::Router;
use salla_axum::webhook_routes_at;
use salla_webhooks::{
    events, CustomerEvent, HandlerError, OrderEvent, ProductEvent, WebhookDispatcher,
    WebhookEvent, WebhookReceiver, WebhookResult, WebhookVerifier,
};

/// Builds the dispatcher with the bundled logging handlers.
pub fn default_dispatcher() -> WebhookResult<WebhookDispatcher> {
    WebhookDispatcher::builder()
        .on_product_created(|event: ProductEvent| async move {
            tracing::info!(
                merchant = event.merchant,
                id = event.data.id,
                name = %event.data.name,
                sku = %event.data.sku,
                price = event.data.price,
                "Product created"
            );
            Ok::<_, HandlerError>(())
        })
        .on_order_created(|event: OrderEvent| async move {
            tracing::info!(
                merchant = event.merchant,
                reference = %event.data.reference_id,
                customer = %event.data.customer.email,
                total = event.data.amount.total,
                currency = %event.data.amount.currency_code,
                items = event.data.items.len(),
                "Order created"
            );
            Ok::<_, HandlerError>(())
        })
        .on_customer_created(|event: CustomerEvent| async move {
            tracing::info!(
                merchant = event.merchant,
                name = %event.data.full_name(),
                email = %event.data.email,
                "Customer created"
            );
            Ok::<_, HandlerError>(())
        })
        .on(events::PRODUCT_UPDATED, log_event)
        .on(events::ORDER_SHIPPED, log_event)
        .build()
}

async fn log_event(event: WebhookEvent) -> Result<(), HandlerError> {
    tracing::info!(
        event = %event.event,
        merchant = event.merchant,
        fields = event.data.len(),
        "Webhook received"
    );
    Ok(())
}

/// Builds the HTTP application: the webhook endpoint plus `/health`.
///
/// Expects a configuration that passed [`ServerConfig::validate`].
pub fn app(config: &ServerConfig, dispatcher: WebhookDispatcher) -> Router {
    let verifier = WebhookVerifier::new(config.webhook_secret.clone());
    let receiver = WebhookReceiver::new(verifier, dispatcher);

    Router::new()
        .merge(webhook_routes_at(&config.webhook_path, receiver))
        .route(HEALTH_PATH, get(|| async { "OK" }))
}

/// Binds the listener and serves until the process is stopped.
pub async fn run(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;
    let dispatcher = default_dispatcher()?;
    let app = app(&config, dispatcher);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(
        "Starting Salla webhook server on {} (endpoint {})",
        config.bind_address(),
        config.webhook_path
    );
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health() {
        let app = app(&ServerConfig::default(), default_dispatcher().unwrap());
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_default_handlers_accept_sample_events() {
        let config = ServerConfig::default();
        let bodies = [
            r#"{"event":"product.created","merchant":1,"data":{"id":1,"name":"Test","price":99.99,"sku":"TEST-001"}}"#,
            r#"{"event":"order.created","merchant":1,"data":{"id":2,"reference_id":"R-2"}}"#,
            r#"{"event":"customer.created","merchant":1,"data":{"id":3,"first_name":"Sara"}}"#,
            r#"{"event":"order.shipped","merchant":1,"data":{"id":2}}"#,
        ];

        for body in bodies {
            let app = app(&config, default_dispatcher().unwrap());
            let request = Request::post("/webhook").body(Body::from(body)).unwrap();
            let response = app.oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{}", body);
        }
    }

    #[tokio::test]
    async fn test_configured_secret_is_enforced() {
        let config = ServerConfig {
            webhook_secret: Some("s3cret".to_string()),
            webhook_path: "/hooks/salla".to_string(),
            ..Default::default()
        };
        let app = app(&config, default_dispatcher().unwrap());

        let request = Request::post("/hooks/salla")
            .header("X-Signature", "nope")
            .body(Body::from(r#"{"event":"order.created"}"#))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
