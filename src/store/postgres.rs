//! PostgreSQL store implementation (sqlx, runtime queries).
//!
//! Cart rows carry a unique (user_id, product_id) index; the idempotent add
//! is a single `ON CONFLICT DO NOTHING` insert, so a double-submitted add can
//! never create two rows. Orders and checkout drafts are stored as JSONB
//! documents under their owning user.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use uuid::Uuid;

use crate::domain::alert::{Alert, AlertKind, AlertPriority};
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

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(10))
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn insert_product(&self, product: &Product) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO products (id, name, description, price, original_price, category, subcategory, stock, status, features, tags, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.original_price)
        .bind(&product.category)
        .bind(&product.subcategory)
        .bind(product.stock)
        .bind(&product.status)
        .bind(&product.features)
        .bind(&product.tags)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_product(&self, product: &Product) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE products SET name = $2, description = $3, price = $4, original_price = $5, category = $6, subcategory = $7, stock = $8, status = $9, features = $10, tags = $11, updated_at = $12 \
             WHERE id = $1",
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.original_price)
        .bind(&product.category)
        .bind(&product.subcategory)
        .bind(product.stock)
        .bind(&product.status)
        .bind(&product.features)
        .bind(&product.tags)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("product"));
        }
        Ok(())
    }

    async fn delete_product(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("product"));
        }
        Ok(())
    }

    async fn product(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    async fn products_by_status(
        &self,
        status: Option<ProductStatus>,
    ) -> Result<Vec<Product>, StoreError> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE $1::text IS NULL OR status = $1 ORDER BY created_at DESC",
        )
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }
}

#[async_trait]
impl CartStore for PgStore {
    async fn add_entry(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> Result<AddEntryOutcome, StoreError> {
        let inserted = sqlx::query_as::<_, CartEntry>(
            "INSERT INTO cart_entries (id, user_id, product_id, quantity, created_at) \
             VALUES ($1, $2, $3, 1, $4) \
             ON CONFLICT (user_id, product_id) DO NOTHING \
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(product_id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;
        Ok(match inserted {
            Some(entry) => AddEntryOutcome::Added(entry),
            None => AddEntryOutcome::AlreadyPresent,
        })
    }

    async fn set_quantity(
        &self,
        user_id: Uuid,
        entry_id: Uuid,
        quantity: Quantity,
    ) -> Result<CartEntry, StoreError> {
        sqlx::query_as::<_, CartEntry>(
            "UPDATE cart_entries SET quantity = $3 WHERE id = $1 AND user_id = $2 RETURNING *",
        )
        .bind(entry_id)
        .bind(user_id)
        .bind(quantity.get())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound("cart entry"))
    }

    async fn remove_entry(&self, user_id: Uuid, entry_id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM cart_entries WHERE id = $1 AND user_id = $2")
            .bind(entry_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("cart entry"));
        }
        Ok(())
    }

    async fn entries_for_user(&self, user_id: Uuid) -> Result<Vec<CartEntry>, StoreError> {
        let entries = sqlx::query_as::<_, CartEntry>(
            "SELECT * FROM cart_entries WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    async fn clear_for_user(&self, user_id: Uuid) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM cart_entries WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl WishlistStore for PgStore {
    async fn toggle(&self, user_id: Uuid, product_id: Uuid) -> Result<WishlistToggle, StoreError> {
        let removed =
            sqlx::query("DELETE FROM wishlist_entries WHERE user_id = $1 AND product_id = $2")
                .bind(user_id)
                .bind(product_id)
                .execute(&self.pool)
                .await?;
        if removed.rows_affected() > 0 {
            return Ok(WishlistToggle::Removed);
        }
        let entry = sqlx::query_as::<_, WishlistEntry>(
            "INSERT INTO wishlist_entries (id, user_id, product_id, created_at) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (user_id, product_id) DO NOTHING \
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(product_id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;
        match entry {
            Some(entry) => Ok(WishlistToggle::Added(entry)),
            // lost a race with a concurrent toggle; treat as removed
            None => Ok(WishlistToggle::Removed),
        }
    }

    async fn wishlist_for_user(&self, user_id: Uuid) -> Result<Vec<WishlistEntry>, StoreError> {
        let entries = sqlx::query_as::<_, WishlistEntry>(
            "SELECT * FROM wishlist_entries WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }
}

#[async_trait]
impl DraftStore for PgStore {
    async fn put_draft(&self, draft: &CheckoutDraft) -> Result<(), StoreError> {
        let document = serde_json::to_value(draft)
            .map_err(|e| StoreError::Other(format!("draft serialization: {e}")))?;
        sqlx::query(
            "INSERT INTO checkout_drafts (id, user_id, document, created_at) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (id) DO UPDATE SET document = EXCLUDED.document",
        )
        .bind(draft.id)
        .bind(draft.user_id)
        .bind(document)
        .bind(draft.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn draft(
        &self,
        user_id: Uuid,
        draft_id: Uuid,
    ) -> Result<Option<CheckoutDraft>, StoreError> {
        let document = sqlx::query_scalar::<_, serde_json::Value>(
            "SELECT document FROM checkout_drafts WHERE id = $1 AND user_id = $2",
        )
        .bind(draft_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        document
            .map(|doc| {
                serde_json::from_value(doc)
                    .map_err(|e| StoreError::Other(format!("draft deserialization: {e}")))
            })
            .transpose()
    }

    async fn delete_draft(&self, user_id: Uuid, draft_id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM checkout_drafts WHERE id = $1 AND user_id = $2")
            .bind(draft_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("checkout draft"));
        }
        Ok(())
    }
}

#[async_trait]
impl OrderStore for PgStore {
    async fn create_order(&self, order: &Order) -> Result<(), StoreError> {
        let document = serde_json::to_value(order)
            .map_err(|e| StoreError::Other(format!("order serialization: {e}")))?;
        sqlx::query(
            "INSERT INTO orders (id, order_id, user_id, payment_status, document, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(Uuid::new_v4())
        .bind(&order.order_id)
        .bind(order.user_id)
        .bind(order.payment.payment_status.as_str())
        .bind(document)
        .bind(order.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn orders_for_user(
        &self,
        user_id: Uuid,
        status: Option<PaymentStatus>,
        search: Option<&str>,
    ) -> Result<Vec<Order>, StoreError> {
        let documents = sqlx::query_scalar::<_, serde_json::Value>(
            "SELECT document FROM orders \
             WHERE user_id = $1 \
               AND ($2::text IS NULL OR payment_status = $2) \
               AND ($3::text IS NULL OR order_id ILIKE '%' || $3 || '%') \
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .bind(status.map(|s| s.as_str()))
        .bind(search.map(str::trim).filter(|s| !s.is_empty()))
        .fetch_all(&self.pool)
        .await?;
        documents
            .into_iter()
            .map(|doc| {
                serde_json::from_value(doc)
                    .map_err(|e| StoreError::Other(format!("order deserialization: {e}")))
            })
            .collect()
    }

    async fn order_for_user(
        &self,
        user_id: Uuid,
        order_id: &str,
    ) -> Result<Option<Order>, StoreError> {
        let document = sqlx::query_scalar::<_, serde_json::Value>(
            "SELECT document FROM orders WHERE user_id = $1 AND order_id = $2",
        )
        .bind(user_id)
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;
        document
            .map(|doc| {
                serde_json::from_value(doc)
                    .map_err(|e| StoreError::Other(format!("order deserialization: {e}")))
            })
            .transpose()
    }
}

/// Alert row with enums flattened to text columns.
#[derive(sqlx::FromRow)]
struct AlertRow {
    id: Uuid,
    user_id: Uuid,
    title: String,
    message: String,
    kind: String,
    priority: String,
    action_url: Option<String>,
    action_text: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<AlertRow> for Alert {
    fn from(row: AlertRow) -> Alert {
        Alert {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            message: row.message,
            kind: AlertKind::parse(&row.kind),
            priority: AlertPriority::parse(&row.priority),
            action_url: row.action_url,
            action_text: row.action_text,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl AlertStore for PgStore {
    async fn insert_alert(&self, alert: &Alert) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO alerts (id, user_id, title, message, kind, priority, action_url, action_text, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(alert.id)
        .bind(alert.user_id)
        .bind(&alert.title)
        .bind(&alert.message)
        .bind(alert.kind.as_str())
        .bind(alert.priority.as_str())
        .bind(&alert.action_url)
        .bind(&alert.action_text)
        .bind(alert.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn alerts_for_user(&self, user_id: Uuid) -> Result<Vec<Alert>, StoreError> {
        let rows = sqlx::query_as::<_, AlertRow>(
            "SELECT * FROM alerts WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Alert::from).collect())
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn upsert_user(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO users (id, email, role, created_at) VALUES ($1, $2, $3, $4) \
             ON CONFLICT (id) DO UPDATE SET email = EXCLUDED.email, role = EXCLUDED.role",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.role)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY email")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }
}
