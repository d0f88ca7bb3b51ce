//! Payment simulation: card validation, urgency surcharges, and a stand-in
//! gateway behind the [`PaymentGateway`] seam.
//!
//! The simulator never talks to a payment network. A real provider
//! integration must replace [`SimulatedGateway`] behind the same trait before
//! production use.

use async_trait::async_trait;
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::value_objects::{Money, Urgency};

/// Raw card form input, exactly as submitted.
#[derive(Debug, Clone, Deserialize)]
pub struct CardInput {
    pub number: String,
    pub expiry_month: String,
    pub expiry_year: String,
    pub cvv: String,
    pub holder_name: String,
}

/// Card details after the validation gate.
#[derive(Debug, Clone)]
pub struct ValidatedCard {
    pub number: String,
    pub expiry_month: u8,
    pub expiry_year: u16,
    pub cvv: String,
    pub holder_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CardError {
    #[error("card number must be exactly 16 digits")]
    InvalidNumber,
    #[error("expiry month is required")]
    MissingExpiryMonth,
    #[error("expiry year is required")]
    MissingExpiryYear,
    #[error("CVV must be 3 or 4 digits")]
    InvalidCvv,
    #[error("cardholder name is required")]
    MissingHolderName,
}

impl CardError {
    /// Name of the form field the error belongs to, for inline display.
    pub fn field(&self) -> &'static str {
        match self {
            CardError::InvalidNumber => "number",
            CardError::MissingExpiryMonth => "expiry_month",
            CardError::MissingExpiryYear => "expiry_year",
            CardError::InvalidCvv => "cvv",
            CardError::MissingHolderName => "holder_name",
        }
    }
}

impl CardInput {
    /// Validation gate. The first failing field aborts; nothing downstream
    /// runs on invalid input.
    pub fn validate(&self) -> Result<ValidatedCard, CardError> {
        let digits: String = self
            .number
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .collect();
        if digits.len() != 16 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(CardError::InvalidNumber);
        }
        let month: u8 = self
            .expiry_month
            .trim()
            .parse()
            .map_err(|_| CardError::MissingExpiryMonth)?;
        if !(1..=12).contains(&month) {
            return Err(CardError::MissingExpiryMonth);
        }
        let year: u16 = self
            .expiry_year
            .trim()
            .parse()
            .map_err(|_| CardError::MissingExpiryYear)?;
        let cvv = self.cvv.trim();
        if !(cvv.len() == 3 || cvv.len() == 4) || !cvv.chars().all(|c| c.is_ascii_digit()) {
            return Err(CardError::InvalidCvv);
        }
        if self.holder_name.trim().is_empty() {
            return Err(CardError::MissingHolderName);
        }
        Ok(ValidatedCard {
            number: digits,
            expiry_month: month,
            expiry_year: year,
            cvv: cvv.to_string(),
            holder_name: self.holder_name.trim().to_string(),
        })
    }
}

/// The amounts actually charged for a draft: subtotal, urgency surcharge,
/// and their sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentBreakdown {
    pub subtotal: Decimal,
    pub urgency_fee: Decimal,
    pub total: Decimal,
    pub currency: String,
}

pub fn charge_amounts(subtotal: &Money, urgency: Urgency) -> PaymentBreakdown {
    let multiplier = urgency.surcharge_multiplier();
    let total = subtotal.scale(multiplier);
    let fee = subtotal.scale(multiplier - Decimal::ONE);
    PaymentBreakdown {
        subtotal: subtotal.amount(),
        urgency_fee: fee.amount(),
        total: total.amount(),
        currency: subtotal.currency().to_string(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayReceipt {
    pub transaction_id: String,
}

/// An expected, retryable outcome. A decline commits nothing anywhere.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeclineReason {
    #[error("card was declined by the issuer")]
    CardDeclined,
    #[error("insufficient funds")]
    InsufficientFunds,
    #[error("payment processor temporarily unavailable")]
    ProcessorUnavailable,
}

/// Boundary to the payment provider. `process` charges the given amount and
/// either returns a receipt or a decline; it never partially succeeds.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn process(&self, amount: &Money) -> Result<GatewayReceipt, DeclineReason>;
}

/// Stand-in gateway: sleeps to emulate a provider round-trip, then resolves
/// the charge by a weighted random draw (95% success by default).
#[derive(Debug, Clone)]
pub struct SimulatedGateway {
    pub success_rate: f64,
    pub delay: Duration,
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        Self { success_rate: 0.95, delay: Duration::from_millis(1500) }
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn process(&self, amount: &Money) -> Result<GatewayReceipt, DeclineReason> {
        tokio::time::sleep(self.delay).await;
        let (approved, reason_draw) = {
            let mut rng = rand::thread_rng();
            (rng.gen_bool(self.success_rate), rng.gen_range(0u8..3))
        };
        if approved {
            let receipt = GatewayReceipt { transaction_id: new_transaction_id() };
            tracing::info!(amount = %amount, transaction_id = %receipt.transaction_id, "simulated charge approved");
            Ok(receipt)
        } else {
            let reason = match reason_draw {
                0 => DeclineReason::CardDeclined,
                1 => DeclineReason::InsufficientFunds,
                _ => DeclineReason::ProcessorUnavailable,
            };
            tracing::info!(amount = %amount, %reason, "simulated charge declined");
            Err(reason)
        }
    }
}

pub fn new_transaction_id() -> String {
    format!("TXN-{:08}", rand::random::<u32>() % 100_000_000)
}

/// Deterministic gateway for tests: always approves or always declines,
/// with no artificial delay.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct ScriptedGateway {
    pub outcome: Result<(), DeclineReason>,
}

#[cfg(test)]
#[async_trait]
impl PaymentGateway for ScriptedGateway {
    async fn process(&self, _amount: &Money) -> Result<GatewayReceipt, DeclineReason> {
        self.outcome
            .clone()
            .map(|()| GatewayReceipt { transaction_id: "TXN-00000042".to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card() -> CardInput {
        CardInput {
            number: "4242 4242 4242 4242".to_string(),
            expiry_month: "09".to_string(),
            expiry_year: "2028".to_string(),
            cvv: "123".to_string(),
            holder_name: "Ada Obi".to_string(),
        }
    }

    #[test]
    fn card_number_normalizes_to_16_digits() {
        let validated = card().validate().unwrap();
        assert_eq!(validated.number, "4242424242424242");
        assert_eq!(validated.expiry_month, 9);
        assert_eq!(validated.expiry_year, 2028);
    }

    #[test]
    fn short_number_rejected() {
        let mut c = card();
        c.number = "4242".to_string();
        assert_eq!(c.validate().unwrap_err(), CardError::InvalidNumber);
    }

    #[test]
    fn missing_expiry_rejected() {
        let mut c = card();
        c.expiry_month = String::new();
        assert_eq!(c.validate().unwrap_err(), CardError::MissingExpiryMonth);
        let mut c = card();
        c.expiry_month = "13".to_string();
        assert_eq!(c.validate().unwrap_err(), CardError::MissingExpiryMonth);
    }

    #[test]
    fn cvv_three_or_four_digits() {
        let mut c = card();
        c.cvv = "12".to_string();
        assert_eq!(c.validate().unwrap_err(), CardError::InvalidCvv);
        c.cvv = "1234".to_string();
        assert!(c.validate().is_ok());
    }

    #[test]
    fn blank_holder_name_rejected() {
        let mut c = card();
        c.holder_name = "   ".to_string();
        assert_eq!(c.validate().unwrap_err(), CardError::MissingHolderName);
    }

    #[test]
    fn error_maps_to_form_field() {
        assert_eq!(CardError::InvalidCvv.field(), "cvv");
    }

    #[test]
    fn surcharge_amounts() {
        let subtotal = Money::usd(Decimal::new(5999, 2));
        let standard = charge_amounts(&subtotal, Urgency::Standard);
        assert_eq!(standard.total, Decimal::new(5999, 2));
        assert_eq!(standard.urgency_fee, Decimal::ZERO);

        let expedited = charge_amounts(&subtotal, Urgency::Expedited);
        assert_eq!(expedited.total, "74.9875".parse::<Decimal>().unwrap());

        let emergency = charge_amounts(&subtotal, Urgency::Emergency);
        assert_eq!(emergency.total, "89.985".parse::<Decimal>().unwrap());
    }
}
