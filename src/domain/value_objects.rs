//! Value objects shared across the storefront domain.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Money value object. Amounts are exact decimals; mixing currencies is an error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: String,
}

impl Money {
    pub fn new(amount: Decimal, currency: &str) -> Self {
        Self { amount, currency: currency.to_string() }
    }

    pub fn usd(amount: Decimal) -> Self {
        Self::new(amount, "USD")
    }

    pub fn zero(currency: &str) -> Self {
        Self::new(Decimal::ZERO, currency)
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn add(&self, other: &Money) -> Result<Money, MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch);
        }
        Ok(Money::new(self.amount + other.amount, &self.currency))
    }

    pub fn multiply(&self, qty: u32) -> Money {
        Money::new(self.amount * Decimal::from(qty), &self.currency)
    }

    /// Scale by an arbitrary decimal factor (urgency surcharges).
    pub fn scale(&self, factor: Decimal) -> Money {
        Money::new(self.amount * factor, &self.currency)
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero("USD")
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum MoneyError {
    #[error("currency mismatch")]
    CurrencyMismatch,
}

/// Cart quantity. Values below 1 are unrepresentable; removal is a separate
/// operation, never quantity zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Quantity(i32);

impl Quantity {
    pub const ONE: Quantity = Quantity(1);

    pub fn new(value: i32) -> Result<Self, QuantityError> {
        if value < 1 {
            return Err(QuantityError::BelowOne(value));
        }
        Ok(Self(value))
    }

    pub fn get(&self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for Quantity {
    type Error = QuantityError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Quantity::new(value)
    }
}

impl From<Quantity> for i32 {
    fn from(q: Quantity) -> i32 {
        q.0
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum QuantityError {
    #[error("quantity must be at least 1, got {0}")]
    BelowOne(i32),
}

/// Requested delivery urgency for a service engagement. Drives a multiplicative
/// surcharge on the order subtotal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    #[default]
    Standard,
    Expedited,
    Emergency,
}

impl Urgency {
    pub fn surcharge_multiplier(&self) -> Decimal {
        match self {
            Urgency::Standard => Decimal::ONE,
            Urgency::Expedited => Decimal::new(125, 2),
            Urgency::Emergency => Decimal::new(150, 2),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Standard => "standard",
            Urgency::Expedited => "expedited",
            Urgency::Emergency => "emergency",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_add_same_currency() {
        let a = Money::usd(Decimal::new(100, 0));
        let b = Money::usd(Decimal::new(50, 0));
        assert_eq!(a.add(&b).unwrap().amount(), Decimal::new(150, 0));
    }

    #[test]
    fn money_add_rejects_mixed_currency() {
        let a = Money::usd(Decimal::ONE);
        let b = Money::new(Decimal::ONE, "EUR");
        assert!(a.add(&b).is_err());
    }

    #[test]
    fn quantity_floor() {
        assert!(Quantity::new(0).is_err());
        assert!(Quantity::new(-3).is_err());
        assert_eq!(Quantity::new(1).unwrap().get(), 1);
    }

    #[test]
    fn urgency_multipliers() {
        assert_eq!(Urgency::Standard.surcharge_multiplier(), Decimal::ONE);
        assert_eq!(Urgency::Expedited.surcharge_multiplier(), Decimal::new(125, 2));
        assert_eq!(Urgency::Emergency.surcharge_multiplier(), Decimal::new(150, 2));
    }
}
