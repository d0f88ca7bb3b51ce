//! In-memory store: RwLock'd maps keyed the same way the database is.
//!
//! Cart and wishlist maps are keyed by (user, product), which is what makes
//! duplicate adds structurally impossible rather than merely checked for.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::domain::alert::Alert;
use crate::domain::cart::{CartEntry, WishlistEntry};
use crate::domain::catalog::{Product, ProductStatus};
use crate::domain::checkout::CheckoutDraft;
use crate::domain::order::{Order, PaymentStatus};
use crate::domain::user::User;
use crate::domain::value_objects::Quantity;

use super::{
    AddEntryOutcome, AlertStore, CartStore, CatalogStore, DraftStore, OrderStore, StoreError,
    UserStore, WishlistStore, WishlistToggle,
};

#[derive(Default)]
struct Collections {
    products: HashMap<Uuid, Product>,
    cart: HashMap<(Uuid, Uuid), CartEntry>,
    wishlist: HashMap<(Uuid, Uuid), WishlistEntry>,
    drafts: HashMap<Uuid, CheckoutDraft>,
    orders: Vec<Order>,
    alerts: Vec<Alert>,
    users: HashMap<Uuid, User>,
}

#[derive(Clone, Default)]
pub struct MemStore {
    inner: Arc<RwLock<Collections>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Collections>, StoreError> {
        self.inner
            .read()
            .map_err(|e| StoreError::Other(format!("lock poisoned: {e}")))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Collections>, StoreError> {
        self.inner
            .write()
            .map_err(|e| StoreError::Other(format!("lock poisoned: {e}")))
    }
}

#[async_trait]
impl CatalogStore for MemStore {
    async fn insert_product(&self, product: &Product) -> Result<(), StoreError> {
        self.write()?.products.insert(product.id, product.clone());
        Ok(())
    }

    async fn update_product(&self, product: &Product) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        if !inner.products.contains_key(&product.id) {
            return Err(StoreError::NotFound("product"));
        }
        inner.products.insert(product.id, product.clone());
        Ok(())
    }

    async fn delete_product(&self, id: Uuid) -> Result<(), StoreError> {
        self.write()?
            .products
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound("product"))
    }

    async fn product(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
        Ok(self.read()?.products.get(&id).cloned())
    }

    async fn products_by_status(
        &self,
        status: Option<ProductStatus>,
    ) -> Result<Vec<Product>, StoreError> {
        let inner = self.read()?;
        let mut products: Vec<Product> = inner
            .products
            .values()
            .filter(|p| status.map_or(true, |s| p.status() == s))
            .cloned()
            .collect();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(products)
    }
}

#[async_trait]
impl CartStore for MemStore {
    async fn add_entry(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> Result<AddEntryOutcome, StoreError> {
        let mut inner = self.write()?;
        if inner.cart.contains_key(&(user_id, product_id)) {
            return Ok(AddEntryOutcome::AlreadyPresent);
        }
        let entry = CartEntry {
            id: Uuid::new_v4(),
            user_id,
            product_id,
            quantity: 1,
            created_at: Utc::now(),
        };
        inner.cart.insert((user_id, product_id), entry.clone());
        Ok(AddEntryOutcome::Added(entry))
    }

    async fn set_quantity(
        &self,
        user_id: Uuid,
        entry_id: Uuid,
        quantity: Quantity,
    ) -> Result<CartEntry, StoreError> {
        let mut inner = self.write()?;
        let entry = inner
            .cart
            .values_mut()
            .find(|e| e.id == entry_id && e.user_id == user_id)
            .ok_or(StoreError::NotFound("cart entry"))?;
        entry.quantity = quantity.get();
        Ok(entry.clone())
    }

    async fn remove_entry(&self, user_id: Uuid, entry_id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        let key = inner
            .cart
            .iter()
            .find(|(_, e)| e.id == entry_id && e.user_id == user_id)
            .map(|(k, _)| *k)
            .ok_or(StoreError::NotFound("cart entry"))?;
        inner.cart.remove(&key);
        Ok(())
    }

    async fn entries_for_user(&self, user_id: Uuid) -> Result<Vec<CartEntry>, StoreError> {
        let inner = self.read()?;
        let mut entries: Vec<CartEntry> = inner
            .cart
            .values()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(entries)
    }

    async fn clear_for_user(&self, user_id: Uuid) -> Result<u64, StoreError> {
        let mut inner = self.write()?;
        let before = inner.cart.len();
        inner.cart.retain(|(owner, _), _| *owner != user_id);
        Ok((before - inner.cart.len()) as u64)
    }
}

#[async_trait]
impl WishlistStore for MemStore {
    async fn toggle(&self, user_id: Uuid, product_id: Uuid) -> Result<WishlistToggle, StoreError> {
        let mut inner = self.write()?;
        if inner.wishlist.remove(&(user_id, product_id)).is_some() {
            return Ok(WishlistToggle::Removed);
        }
        let entry = WishlistEntry {
            id: Uuid::new_v4(),
            user_id,
            product_id,
            created_at: Utc::now(),
        };
        inner.wishlist.insert((user_id, product_id), entry.clone());
        Ok(WishlistToggle::Added(entry))
    }

    async fn wishlist_for_user(&self, user_id: Uuid) -> Result<Vec<WishlistEntry>, StoreError> {
        let inner = self.read()?;
        let mut entries: Vec<WishlistEntry> = inner
            .wishlist
            .values()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(entries)
    }
}

#[async_trait]
impl DraftStore for MemStore {
    async fn put_draft(&self, draft: &CheckoutDraft) -> Result<(), StoreError> {
        self.write()?.drafts.insert(draft.id, draft.clone());
        Ok(())
    }

    async fn draft(
        &self,
        user_id: Uuid,
        draft_id: Uuid,
    ) -> Result<Option<CheckoutDraft>, StoreError> {
        Ok(self
            .read()?
            .drafts
            .get(&draft_id)
            .filter(|d| d.user_id == user_id)
            .cloned())
    }

    async fn delete_draft(&self, user_id: Uuid, draft_id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        match inner.drafts.get(&draft_id) {
            Some(d) if d.user_id == user_id => {
                inner.drafts.remove(&draft_id);
                Ok(())
            }
            _ => Err(StoreError::NotFound("checkout draft")),
        }
    }
}

#[async_trait]
impl OrderStore for MemStore {
    async fn create_order(&self, order: &Order) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        // order_id is a lookup key; the database enforces this with a unique
        // constraint
        if inner.orders.iter().any(|o| o.order_id == order.order_id) {
            return Err(StoreError::Other(format!(
                "duplicate order id {}",
                order.order_id
            )));
        }
        inner.orders.push(order.clone());
        Ok(())
    }

    async fn orders_for_user(
        &self,
        user_id: Uuid,
        status: Option<PaymentStatus>,
        search: Option<&str>,
    ) -> Result<Vec<Order>, StoreError> {
        let inner = self.read()?;
        let mut orders: Vec<Order> = inner
            .orders
            .iter()
            .filter(|o| o.user_id == user_id && o.matches(status, search))
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn order_for_user(
        &self,
        user_id: Uuid,
        order_id: &str,
    ) -> Result<Option<Order>, StoreError> {
        Ok(self
            .read()?
            .orders
            .iter()
            .find(|o| o.user_id == user_id && o.order_id == order_id)
            .cloned())
    }
}

#[async_trait]
impl AlertStore for MemStore {
    async fn insert_alert(&self, alert: &Alert) -> Result<(), StoreError> {
        self.write()?.alerts.push(alert.clone());
        Ok(())
    }

    async fn alerts_for_user(&self, user_id: Uuid) -> Result<Vec<Alert>, StoreError> {
        let inner = self.read()?;
        let mut alerts: Vec<Alert> = inner
            .alerts
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        alerts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(alerts)
    }
}

#[async_trait]
impl UserStore for MemStore {
    async fn upsert_user(&self, user: &User) -> Result<(), StoreError> {
        self.write()?.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let inner = self.read()?;
        let mut users: Vec<User> = inner.users.values().cloned().collect();
        users.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(users)
    }
}
