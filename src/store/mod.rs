//! Persistence seam: per-collection traits over the document store.
//!
//! The binary runs on [`postgres::PgStore`]; [`memory::MemStore`] backs the
//! test suite and local development without a database. Record ownership is
//! scoped to a single user id throughout, so no operation here crosses user
//! boundaries.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::alert::Alert;
use crate::domain::cart::{CartEntry, WishlistEntry};
use crate::domain::catalog::{Product, ProductStatus};
use crate::domain::checkout::CheckoutDraft;
use crate::domain::order::{Order, PaymentStatus};
use crate::domain::user::User;
use crate::domain::value_objects::Quantity;

pub use memory::MemStore;
pub use postgres::PgStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("storage error: {0}")]
    Other(String),
}

/// Result of an idempotent cart add. The store itself rejects the duplicate
/// (composite key on user and product), so there is no check-then-write race.
#[derive(Debug, Clone)]
pub enum AddEntryOutcome {
    Added(CartEntry),
    AlreadyPresent,
}

#[derive(Debug, Clone)]
pub enum WishlistToggle {
    Added(WishlistEntry),
    Removed,
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn insert_product(&self, product: &Product) -> Result<(), StoreError>;
    async fn update_product(&self, product: &Product) -> Result<(), StoreError>;
    async fn delete_product(&self, id: Uuid) -> Result<(), StoreError>;
    async fn product(&self, id: Uuid) -> Result<Option<Product>, StoreError>;
    /// `None` lists everything (admin view); storefront passes `Active`.
    async fn products_by_status(
        &self,
        status: Option<ProductStatus>,
    ) -> Result<Vec<Product>, StoreError>;
}

#[async_trait]
pub trait CartStore: Send + Sync {
    async fn add_entry(&self, user_id: Uuid, product_id: Uuid)
        -> Result<AddEntryOutcome, StoreError>;
    async fn set_quantity(
        &self,
        user_id: Uuid,
        entry_id: Uuid,
        quantity: Quantity,
    ) -> Result<CartEntry, StoreError>;
    async fn remove_entry(&self, user_id: Uuid, entry_id: Uuid) -> Result<(), StoreError>;
    async fn entries_for_user(&self, user_id: Uuid) -> Result<Vec<CartEntry>, StoreError>;
    /// Bulk clear after a successful payment. Returns the number removed.
    async fn clear_for_user(&self, user_id: Uuid) -> Result<u64, StoreError>;
}

#[async_trait]
pub trait WishlistStore: Send + Sync {
    async fn toggle(&self, user_id: Uuid, product_id: Uuid) -> Result<WishlistToggle, StoreError>;
    async fn wishlist_for_user(&self, user_id: Uuid) -> Result<Vec<WishlistEntry>, StoreError>;
}

#[async_trait]
pub trait DraftStore: Send + Sync {
    async fn put_draft(&self, draft: &CheckoutDraft) -> Result<(), StoreError>;
    async fn draft(&self, user_id: Uuid, draft_id: Uuid)
        -> Result<Option<CheckoutDraft>, StoreError>;
    async fn delete_draft(&self, user_id: Uuid, draft_id: Uuid) -> Result<(), StoreError>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Append-only; nothing ever updates a stored order's financial fields.
    async fn create_order(&self, order: &Order) -> Result<(), StoreError>;
    async fn orders_for_user(
        &self,
        user_id: Uuid,
        status: Option<PaymentStatus>,
        search: Option<&str>,
    ) -> Result<Vec<Order>, StoreError>;
    async fn order_for_user(
        &self,
        user_id: Uuid,
        order_id: &str,
    ) -> Result<Option<Order>, StoreError>;
}

#[async_trait]
pub trait AlertStore: Send + Sync {
    async fn insert_alert(&self, alert: &Alert) -> Result<(), StoreError>;
    async fn alerts_for_user(&self, user_id: Uuid) -> Result<Vec<Alert>, StoreError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn upsert_user(&self, user: &User) -> Result<(), StoreError>;
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;
}

/// The whole document store, one collection trait per record type.
pub trait Store:
    CatalogStore + CartStore + WishlistStore + DraftStore + OrderStore + AlertStore + UserStore
{
}

impl<T> Store for T where
    T: CatalogStore + CartStore + WishlistStore + DraftStore + OrderStore + AlertStore + UserStore
{
}
