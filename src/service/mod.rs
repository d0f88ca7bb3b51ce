//! Service layer: the storefront and admin operations, written against the
//! store and gateway seams so they test without HTTP or a database.

pub mod admin;
pub mod alerts;
pub mod cart;
pub mod checkout;
pub mod orders;
pub mod payment;
