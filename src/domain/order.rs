//! Completed orders: immutable records materialized at the instant a
//! simulated payment succeeds.
//!
//! The serialized field names are the de facto wire format shared with the
//! storefront views and must stay camelCase.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::checkout::{CheckoutDraft, CheckoutError};
use super::payment::PaymentBreakdown;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: String,
    pub user_id: Uuid,
    pub customer_info: CustomerInfo,
    pub shipping_address: OrderAddress,
    pub service_details: OrderServiceDetails,
    pub items: Vec<OrderItem>,
    pub payment: OrderPayment,
    pub project_status: ProjectStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderServiceDetails {
    pub project_description: String,
    pub delivery_timeline: String,
    pub urgency_level: String,
    pub communication_preference: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: Uuid,
    pub product_name: String,
    pub category: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayment {
    pub subtotal: Decimal,
    pub urgency_fee: Decimal,
    pub total_amount: Decimal,
    pub currency: String,
    pub payment_status: PaymentStatus,
    pub transaction_id: String,
}

/// Settlement status of the order, used for archive filtering. Simulated
/// payments settle immediately, so new orders record `Completed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Processing,
    Completed,
    Cancelled,
    Refunded,
}

impl PaymentStatus {
    pub fn parse(value: &str) -> Option<PaymentStatus> {
        match value {
            "pending" => Some(PaymentStatus::Pending),
            "processing" => Some(PaymentStatus::Processing),
            "completed" => Some(PaymentStatus::Completed),
            "cancelled" => Some(PaymentStatus::Cancelled),
            "refunded" => Some(PaymentStatus::Refunded),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Processing => "processing",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Cancelled => "cancelled",
            PaymentStatus::Refunded => "refunded",
        }
    }
}

/// Back-office delivery lifecycle. Only the initial value is written here;
/// advancement belongs to the project-management side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    PendingAssignment,
    Assigned,
    InProgress,
    UnderReview,
    Completed,
}

impl Order {
    /// Denormalizes a completed draft plus the charged amounts into the
    /// durable record. Financial fields are never touched again.
    pub fn from_draft(
        draft: &CheckoutDraft,
        breakdown: PaymentBreakdown,
        transaction_id: String,
    ) -> Result<Order, CheckoutError> {
        draft.require_ready()?;
        let personal = draft.personal.as_ref().ok_or(CheckoutError::NotReadyForPayment)?;
        let address = draft.address.as_ref().ok_or(CheckoutError::NotReadyForPayment)?;
        let service = draft.service.as_ref().ok_or(CheckoutError::NotReadyForPayment)?;

        let items = draft
            .lines
            .iter()
            .map(|line| OrderItem {
                product_id: line.product_id,
                product_name: line.product_name.clone(),
                category: line.category.clone(),
                quantity: line.quantity,
                unit_price: line.unit_price,
                total_price: line.line_total(),
            })
            .collect();

        Ok(Order {
            order_id: new_order_id(),
            user_id: draft.user_id,
            customer_info: CustomerInfo {
                first_name: personal.first_name.clone(),
                last_name: personal.last_name.clone(),
                email: personal.email.clone(),
                phone: personal.phone.clone(),
                date_of_birth: personal.date_of_birth.clone(),
            },
            shipping_address: OrderAddress {
                street: address.street.clone(),
                city: address.city.clone(),
                state: address.state.clone(),
                postal_code: address.postal_code.clone(),
                country: address.country.clone(),
            },
            service_details: OrderServiceDetails {
                project_description: service.project_description.clone(),
                delivery_timeline: service.delivery_timeline.clone(),
                urgency_level: service.urgency.as_str().to_string(),
                communication_preference: service.communication_preference.clone(),
            },
            items,
            payment: OrderPayment {
                subtotal: breakdown.subtotal,
                urgency_fee: breakdown.urgency_fee,
                total_amount: breakdown.total,
                currency: breakdown.currency,
                payment_status: PaymentStatus::Completed,
                transaction_id,
            },
            project_status: ProjectStatus::default(),
            created_at: Utc::now(),
        })
    }

    /// Archive filter: settlement status plus free-text match on the order id.
    pub fn matches(&self, status: Option<PaymentStatus>, search: Option<&str>) -> bool {
        if let Some(wanted) = status {
            if self.payment.payment_status != wanted {
                return false;
            }
        }
        if let Some(needle) = search {
            if !needle.trim().is_empty()
                && !self.order_id.to_lowercase().contains(&needle.trim().to_lowercase())
            {
                return false;
            }
        }
        true
    }
}

pub fn new_order_id() -> String {
    format!("ORD-{:08}", rand::random::<u32>() % 100_000_000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::checkout::tests::complete_draft;
    use crate::domain::payment::charge_amounts;
    use crate::domain::value_objects::{Money, Urgency};

    fn order(urgency: Urgency) -> Order {
        let draft = complete_draft(urgency);
        let breakdown = charge_amounts(&Money::usd(draft.subtotal), urgency);
        Order::from_draft(&draft, breakdown, "TXN-00000042".to_string()).unwrap()
    }

    #[test]
    fn denormalizes_items_and_amounts() {
        let o = order(Urgency::Expedited);
        assert_eq!(o.items.len(), 2);
        assert_eq!(o.payment.subtotal, Decimal::new(5999, 2));
        assert_eq!(o.payment.total_amount, "74.9875".parse::<Decimal>().unwrap());
        assert_eq!(o.payment.payment_status, PaymentStatus::Completed);
        assert_eq!(o.project_status, ProjectStatus::PendingAssignment);
        assert!(o.order_id.starts_with("ORD-"));
    }

    #[test]
    fn wire_format_is_camel_case() {
        let json = serde_json::to_value(order(Urgency::Standard)).unwrap();
        assert!(json.get("orderId").is_some());
        assert!(json["customerInfo"].get("firstName").is_some());
        assert!(json["payment"].get("totalAmount").is_some());
        assert!(json["payment"].get("urgencyFee").is_some());
        assert!(json["items"][0].get("productId").is_some());
        assert_eq!(json["projectStatus"], "pending_assignment");
        assert_eq!(json["serviceDetails"]["urgencyLevel"], "standard");
    }

    #[test]
    fn incomplete_draft_cannot_become_order() {
        let mut draft = complete_draft(Urgency::Standard);
        draft.step_back();
        let breakdown = charge_amounts(&Money::usd(draft.subtotal), Urgency::Standard);
        assert!(Order::from_draft(&draft, breakdown, "TXN-1".to_string()).is_err());
    }

    #[test]
    fn filter_by_status_and_search() {
        let o = order(Urgency::Standard);
        assert!(o.matches(Some(PaymentStatus::Completed), None));
        assert!(!o.matches(Some(PaymentStatus::Refunded), None));
        let prefix = o.order_id[..7].to_lowercase();
        assert!(o.matches(None, Some(&prefix)));
        assert!(!o.matches(None, Some("ZZZ-404")));
    }
}
