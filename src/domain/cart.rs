//! Cart and wishlist ledgers: per-user associations to catalog products.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::catalog::Product;
use super::value_objects::Money;

/// One cart row. Unique per (user, product); uniqueness is enforced by the
/// store through a composite key, not by a pre-read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CartEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct WishlistEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A cart entry joined against its product, as shown to the shopper and as
/// snapshotted into a checkout draft.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub entry_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub category: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

impl CartLine {
    pub fn from_entry(entry: &CartEntry, product: &Product) -> Self {
        Self {
            entry_id: entry.id,
            product_id: product.id,
            product_name: product.name.clone(),
            category: product.category.clone(),
            quantity: entry.quantity,
            unit_price: product.price,
        }
    }

    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

pub fn cart_subtotal(lines: &[CartLine], currency: &str) -> Money {
    let sum = lines.iter().fold(Decimal::ZERO, |acc, l| acc + l.line_total());
    Money::new(sum, currency)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(price: Decimal, qty: i32) -> CartLine {
        CartLine {
            entry_id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            product_name: "Managed VPS".to_string(),
            category: "hosting".to_string(),
            quantity: qty,
            unit_price: price,
        }
    }

    #[test]
    fn subtotal_sums_line_totals() {
        let lines = vec![line(Decimal::new(2999, 2), 1), line(Decimal::new(1000, 2), 3)];
        let subtotal = cart_subtotal(&lines, "USD");
        assert_eq!(subtotal.amount(), Decimal::new(5999, 2));
    }

    #[test]
    fn empty_cart_subtotal_is_zero() {
        assert_eq!(cart_subtotal(&[], "USD").amount(), Decimal::ZERO);
    }
}
