//! Checkout wizard: a four-step linear form accumulating a single order
//! draft, gated on per-step field presence.
//!
//! The draft is server-held and keyed by id so it survives page navigation;
//! the cart snapshot is captured once at draft creation and deliberately not
//! refreshed if the catalog changes mid-flow.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::cart::{cart_subtotal, CartLine};
use super::value_objects::Urgency;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    PersonalInfo,
    Address,
    ServiceDetails,
    Review,
}

impl CheckoutStep {
    pub fn next(&self) -> Option<CheckoutStep> {
        match self {
            CheckoutStep::PersonalInfo => Some(CheckoutStep::Address),
            CheckoutStep::Address => Some(CheckoutStep::ServiceDetails),
            CheckoutStep::ServiceDetails => Some(CheckoutStep::Review),
            CheckoutStep::Review => None,
        }
    }

    pub fn back(&self) -> Option<CheckoutStep> {
        match self {
            CheckoutStep::PersonalInfo => None,
            CheckoutStep::Address => Some(CheckoutStep::PersonalInfo),
            CheckoutStep::ServiceDetails => Some(CheckoutStep::Address),
            CheckoutStep::Review => Some(CheckoutStep::ServiceDetails),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStep::PersonalInfo => "personal_info",
            CheckoutStep::Address => "address",
            CheckoutStep::ServiceDetails => "service_details",
            CheckoutStep::Review => "review",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PersonalInfo {
    #[validate(length(min = 1, message = "first_name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "last_name is required"))]
    pub last_name: String,
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "phone is required"))]
    pub phone: String,
    #[validate(length(min = 1, message = "date_of_birth is required"))]
    pub date_of_birth: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ShippingAddress {
    #[validate(length(min = 1, message = "street is required"))]
    pub street: String,
    #[validate(length(min = 1, message = "city is required"))]
    pub city: String,
    #[validate(length(min = 1, message = "state is required"))]
    pub state: String,
    #[validate(length(min = 1, message = "postal_code is required"))]
    pub postal_code: String,
    #[validate(length(min = 1, message = "country is required"))]
    pub country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServiceDetails {
    #[validate(length(min = 1, message = "project_description is required"))]
    pub project_description: String,
    #[validate(length(min = 1, message = "delivery_timeline is required"))]
    pub delivery_timeline: String,
    #[serde(default)]
    pub urgency: Urgency,
    #[validate(length(min = 1, message = "communication_preference is required"))]
    pub communication_preference: String,
}

/// Payload for the wizard step currently being submitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum StepInput {
    PersonalInfo(PersonalInfo),
    Address(ShippingAddress),
    ServiceDetails(ServiceDetails),
}

impl StepInput {
    fn step(&self) -> CheckoutStep {
        match self {
            StepInput::PersonalInfo(_) => CheckoutStep::PersonalInfo,
            StepInput::Address(_) => CheckoutStep::Address,
            StepInput::ServiceDetails(_) => CheckoutStep::ServiceDetails,
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,
    #[error("draft is on step {current}, payload is for step {submitted}")]
    WrongStep { current: String, submitted: String },
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),
    #[error("draft is not ready for payment")]
    NotReadyForPayment,
}

/// The transient order draft accumulated by the wizard. Persisted only as a
/// short-lived draft record; a durable [`super::order::Order`] is written
/// solely on payment success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutDraft {
    pub id: Uuid,
    pub user_id: Uuid,
    pub step: CheckoutStep,
    pub personal: Option<PersonalInfo>,
    pub address: Option<ShippingAddress>,
    pub service: Option<ServiceDetails>,
    pub lines: Vec<CartLine>,
    pub subtotal: Decimal,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

impl CheckoutDraft {
    /// Opens a draft over a snapshot of the shopper's cart. An empty cart
    /// cannot enter checkout.
    pub fn begin(user_id: Uuid, lines: Vec<CartLine>, currency: &str) -> Result<Self, CheckoutError> {
        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let subtotal = cart_subtotal(&lines, currency).amount();
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            step: CheckoutStep::PersonalInfo,
            personal: None,
            address: None,
            service: None,
            lines,
            subtotal,
            currency: currency.to_string(),
            created_at: Utc::now(),
        })
    }

    /// Applies the payload for the current step and advances. Advancement is
    /// refused unless every required field of the step is present; the
    /// offending fields are reported by name and the draft is left untouched.
    pub fn submit_step(&mut self, input: StepInput) -> Result<CheckoutStep, CheckoutError> {
        if input.step() != self.step {
            return Err(CheckoutError::WrongStep {
                current: self.step.as_str().to_string(),
                submitted: input.step().as_str().to_string(),
            });
        }
        match input {
            StepInput::PersonalInfo(p) => {
                check_presence(&p)?;
                self.personal = Some(p);
            }
            StepInput::Address(a) => {
                check_presence(&a)?;
                self.address = Some(a);
            }
            StepInput::ServiceDetails(s) => {
                check_presence(&s)?;
                self.service = Some(s);
            }
        }
        // next() is always Some here: Review has no submittable payload.
        if let Some(next) = self.step.next() {
            self.step = next;
        }
        Ok(self.step)
    }

    /// Steps back without discarding anything already entered.
    pub fn step_back(&mut self) -> CheckoutStep {
        if let Some(prev) = self.step.back() {
            self.step = prev;
        }
        self.step
    }

    pub fn urgency(&self) -> Urgency {
        self.service.as_ref().map(|s| s.urgency).unwrap_or_default()
    }

    pub fn ready_for_payment(&self) -> bool {
        self.step == CheckoutStep::Review
            && self.personal.is_some()
            && self.address.is_some()
            && self.service.is_some()
    }

    pub fn require_ready(&self) -> Result<(), CheckoutError> {
        if self.ready_for_payment() {
            Ok(())
        } else {
            Err(CheckoutError::NotReadyForPayment)
        }
    }
}

fn check_presence<T: Validate>(value: &T) -> Result<(), CheckoutError> {
    match value.validate() {
        Ok(()) => Ok(()),
        Err(errors) => {
            let mut fields: Vec<String> =
                errors.field_errors().keys().map(|k| k.to_string()).collect();
            fields.sort();
            Err(CheckoutError::MissingFields(fields))
        }
    }
}
