//! Domain events published to NATS when a client is configured.
//!
//! Publishing is best-effort: a missing or failing broker never fails the
//! user-facing operation.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DomainEvent {
    OrderPlaced {
        order_id: String,
        user_id: Uuid,
        total: Decimal,
        currency: String,
    },
    PaymentDeclined {
        user_id: Uuid,
        reason: String,
    },
    AlertBroadcast {
        title: String,
        delivered: usize,
        failed: usize,
    },
    ProductCreated {
        product_id: Uuid,
        name: String,
    },
}

impl DomainEvent {
    pub fn subject(&self) -> &'static str {
        match self {
            DomainEvent::OrderPlaced { .. } => "commerce.orders.placed",
            DomainEvent::PaymentDeclined { .. } => "commerce.payments.declined",
            DomainEvent::AlertBroadcast { .. } => "commerce.alerts.broadcast",
            DomainEvent::ProductCreated { .. } => "commerce.products.created",
        }
    }
}

/// Fire-and-forget publish. Serialization problems and broker errors are
/// logged and swallowed.
pub async fn publish(client: Option<&async_nats::Client>, event: &DomainEvent) {
    let Some(client) = client else { return };
    let payload = match serde_json::to_vec(event) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(%err, "failed to serialize domain event");
            return;
        }
    };
    if let Err(err) = client.publish(event.subject().to_string(), payload.into()).await {
        tracing::warn!(%err, subject = event.subject(), "failed to publish domain event");
    }
}
