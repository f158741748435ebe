//! Event envelope and typed event views.

use chrono::{DateTime, Utc};
use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use salla_core::{Customer, Order, Product};

use crate::error::{WebhookError, WebhookResult};

/// Event type tags sent by Salla.
pub mod events {
    pub const PRODUCT_CREATED: &str = "product.created";
    pub const PRODUCT_UPDATED: &str = "product.updated";
    pub const PRODUCT_DELETED: &str = "product.deleted";

    pub const ORDER_CREATED: &str = "order.created";
    pub const ORDER_UPDATED: &str = "order.updated";
    pub const ORDER_CANCELLED: &str = "order.cancelled";
    pub const ORDER_SHIPPED: &str = "order.shipped";
    pub const ORDER_DELIVERED: &str = "order.delivered";

    pub const CUSTOMER_CREATED: &str = "customer.created";
    pub const CUSTOMER_UPDATED: &str = "customer.updated";
    pub const CUSTOMER_DELETED: &str = "customer.deleted";

    pub const CATEGORY_CREATED: &str = "category.created";
    pub const CATEGORY_UPDATED: &str = "category.updated";
    pub const CATEGORY_DELETED: &str = "category.deleted";

    pub const BRAND_CREATED: &str = "brand.created";
    pub const BRAND_UPDATED: &str = "brand.updated";
    pub const BRAND_DELETED: &str = "brand.deleted";

    pub const CART_ABANDONED: &str = "cart.abandoned";
    pub const CART_RESTORED: &str = "cart.restored";

    pub const PAYMENT_COMPLETED: &str = "payment.completed";
    pub const PAYMENT_FAILED: &str = "payment.failed";

    pub const SHIPMENT_CREATED: &str = "shipment.created";
    pub const SHIPMENT_UPDATED: &str = "shipment.updated";
}

/// The generic webhook envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// Event type tag, e.g. `order.created`.
    pub event: String,
    /// Merchant (store) id.
    #[serde(default)]
    pub merchant: i64,
    /// Raw event payload.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: Map<String, Value>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

impl WebhookEvent {
    /// Parses an envelope from raw request bytes.
    pub fn parse(payload: &[u8]) -> WebhookResult<Self> {
        Ok(serde_json::from_slice(payload)?)
    }
}

/// An envelope whose payload has been decoded into `T`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedEvent<T> {
    pub event: String,
    pub merchant: i64,
    pub data: T,
    pub created_at: Option<DateTime<Utc>>,
}

/// A `product.*` event.
pub type ProductEvent = TypedEvent<Product>;

/// An `order.*` event.
pub type OrderEvent = TypedEvent<Order>;

/// A `customer.*` event.
pub type CustomerEvent = TypedEvent<Customer>;

impl<T: DeserializeOwned> TypedEvent<T> {
    /// Decodes the envelope's payload into `T`.
    ///
    /// Fails with [`WebhookError::SchemaMismatch`] when the payload does not
    /// have the shape of `T`.
    pub fn from_envelope(envelope: WebhookEvent) -> WebhookResult<Self> {
        let WebhookEvent {
            event,
            merchant,
            data,
            created_at,
        } = envelope;

        match serde_json::from_value(Value::Object(data)) {
            Ok(data) => Ok(Self {
                event,
                merchant,
                data,
                created_at,
            }),
            Err(e) => Err(WebhookError::SchemaMismatch {
                event,
                reason: e.to_string(),
            }),
        }
    }
}

impl<T: DeserializeOwned> TryFrom<WebhookEvent> for TypedEvent<T> {
    type Error = WebhookError;

    fn try_from(envelope: WebhookEvent) -> WebhookResult<Self> {
        Self::from_envelope(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRODUCT_CREATED: &str = r#"{
        "event": "product.created",
        "merchant": 12345,
        "data": {"id": 1, "name": "Test Product", "price": 99.99, "sku": "TEST-001"},
        "created_at": "2024-01-01T00:00:00Z"
    }"#;

    #[test]
    fn test_parse_envelope() {
        let event = WebhookEvent::parse(PRODUCT_CREATED.as_bytes()).unwrap();
        assert_eq!(event.event, events::PRODUCT_CREATED);
        assert_eq!(event.merchant, 12345);
        assert_eq!(event.data["sku"], "TEST-001");
        assert_eq!(
            event.created_at.map(|t| t.to_rfc3339()).as_deref(),
            Some("2024-01-01T00:00:00+00:00")
        );
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let event = WebhookEvent::parse(br#"{"event": "cart.abandoned"}"#).unwrap();
        assert_eq!(event.merchant, 0);
        assert!(event.data.is_empty());
        assert!(event.created_at.is_none());

        let event =
            WebhookEvent::parse(br#"{"event": "cart.abandoned", "data": null}"#).unwrap();
        assert!(event.data.is_empty());
    }

    #[test]
    fn test_malformed_envelope() {
        let bodies: [&[u8]; 4] = [
            b"not json",
            br#"{"merchant": 1}"#,
            br#"{"event": "order.created", "data": [1, 2]}"#,
            b"",
        ];
        for body in bodies {
            let err = WebhookEvent::parse(body).unwrap_err();
            assert!(matches!(err, WebhookError::MalformedPayload(_)));
        }
    }

    #[test]
    fn test_typed_round_trip() {
        let envelope = WebhookEvent::parse(PRODUCT_CREATED.as_bytes()).unwrap();
        let typed = ProductEvent::from_envelope(envelope.clone()).unwrap();

        assert_eq!(typed.event, envelope.event);
        assert_eq!(typed.merchant, envelope.merchant);
        assert_eq!(typed.created_at, envelope.created_at);
        assert_eq!(typed.data.id, 1);
        assert_eq!(typed.data.name, "Test Product");
        assert_eq!(typed.data.price, 99.99);
        assert_eq!(typed.data.sku, "TEST-001");
    }

    #[test]
    fn test_schema_mismatch() {
        let envelope = WebhookEvent::parse(
            br#"{"event": "product.created", "data": {"id": "not-a-number"}}"#,
        )
        .unwrap();

        match ProductEvent::try_from(envelope) {
            Err(WebhookError::SchemaMismatch { event, .. }) => {
                assert_eq!(event, "product.created")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
