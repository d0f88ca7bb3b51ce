//! Domain layer: catalog, ledgers, checkout wizard, payment simulation,
//! orders, and alerts.

pub mod alert;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod events;
pub mod order;
pub mod payment;
pub mod user;
pub mod value_objects;

pub use alert::{Alert, AlertPayload, BroadcastReport};
pub use cart::{CartEntry, CartLine, WishlistEntry};
pub use catalog::{Product, ProductInput, ProductStatus};
pub use checkout::{CheckoutDraft, CheckoutError, CheckoutStep, StepInput};
pub use order::{Order, PaymentStatus, ProjectStatus};
pub use payment::{CardInput, DeclineReason, PaymentGateway, SimulatedGateway};
pub use user::{Role, User};
pub use value_objects::{Money, Quantity, Urgency};
