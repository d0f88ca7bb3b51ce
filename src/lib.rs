//! HostForge Commerce
//!
//! Storefront and admin service for a hosting/development services business.
//!
//! ## Features
//! - Product catalog with admin CRUD
//! - Per-user cart and wishlist ledgers
//! - Four-step checkout wizard with a server-held draft
//! - Simulated payment gateway behind a stable trait
//! - Durable order archive with history filtering
//! - Bulk alert broadcasting to user inboxes

pub mod config;
pub mod domain;
pub mod error;
pub mod routes;
pub mod service;
pub mod session;
pub mod state;
pub mod store;

pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use session::Session;
pub use state::AppState;
