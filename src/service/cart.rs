//! Cart and wishlist operations.

use serde::Serialize;
use uuid::Uuid;

use crate::domain::cart::{cart_subtotal, CartLine};
use crate::domain::catalog::Product;
use crate::domain::value_objects::Quantity;
use crate::error::{ApiError, ApiResult};
use crate::session::Session;
use crate::store::{AddEntryOutcome, Store, WishlistToggle};

/// Outcome of an add: either the new entry or a notice that the pair was
/// already in the cart (the add is a no-op then, quantity untouched).
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CartAdd {
    Added { entry_id: Uuid },
    AlreadyInCart,
}

pub async fn add_to_cart(
    store: &dyn Store,
    session: &Session,
    product_id: Uuid,
) -> ApiResult<CartAdd> {
    let product = store
        .product(product_id)
        .await?
        .ok_or(ApiError::NotFound("product"))?;
    if !product.is_active() {
        return Err(ApiError::Validation("product is not available".to_string()));
    }
    match store.add_entry(session.user_id, product_id).await? {
        AddEntryOutcome::Added(entry) => Ok(CartAdd::Added { entry_id: entry.id }),
        AddEntryOutcome::AlreadyPresent => Ok(CartAdd::AlreadyInCart),
    }
}

/// The shopper's cart joined against the catalog. Entries whose product no
/// longer resolves are skipped rather than surfaced as errors.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub subtotal: rust_decimal::Decimal,
    pub currency: String,
}

pub async fn view_cart(store: &dyn Store, session: &Session, currency: &str) -> ApiResult<CartView> {
    let entries = store.entries_for_user(session.user_id).await?;
    let mut lines = Vec::with_capacity(entries.len());
    for entry in &entries {
        match store.product(entry.product_id).await? {
            Some(product) => lines.push(CartLine::from_entry(entry, &product)),
            None => {
                tracing::debug!(entry_id = %entry.id, product_id = %entry.product_id, "skipping dangling cart entry");
            }
        }
    }
    let subtotal = cart_subtotal(&lines, currency).amount();
    Ok(CartView { lines, subtotal, currency: currency.to_string() })
}

pub async fn change_quantity(
    store: &dyn Store,
    session: &Session,
    entry_id: Uuid,
    quantity: i32,
) -> ApiResult<()> {
    let quantity = Quantity::new(quantity)?;
    store.set_quantity(session.user_id, entry_id, quantity).await?;
    Ok(())
}

pub async fn remove_from_cart(
    store: &dyn Store,
    session: &Session,
    entry_id: Uuid,
) -> ApiResult<()> {
    store.remove_entry(session.user_id, entry_id).await?;
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WishlistChange {
    Added,
    Removed,
}

pub async fn toggle_wishlist(
    store: &dyn Store,
    session: &Session,
    product_id: Uuid,
) -> ApiResult<WishlistChange> {
    store
        .product(product_id)
        .await?
        .ok_or(ApiError::NotFound("product"))?;
    match store.toggle(session.user_id, product_id).await? {
        WishlistToggle::Added(_) => Ok(WishlistChange::Added),
        WishlistToggle::Removed => Ok(WishlistChange::Removed),
    }
}

/// Wishlist joined against the catalog, dangling references skipped.
pub async fn view_wishlist(store: &dyn Store, session: &Session) -> ApiResult<Vec<Product>> {
    let entries = store.wishlist_for_user(session.user_id).await?;
    let mut products = Vec::with_capacity(entries.len());
    for entry in &entries {
        if let Some(product) = store.product(entry.product_id).await? {
            products.push(product);
        }
    }
    Ok(products)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::Role;
    use crate::service::testing::{active_product, customer_session, seeded_store};
    use crate::store::CartStore;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn add_to_cart_is_idempotent() {
        let (store, products) = seeded_store().await;
        let session = customer_session();
        let first = add_to_cart(&store, &session, products[0].id).await.unwrap();
        assert!(matches!(first, CartAdd::Added { .. }));
        let second = add_to_cart(&store, &session, products[0].id).await.unwrap();
        assert!(matches!(second, CartAdd::AlreadyInCart));

        let view = view_cart(&store, &session, "USD").await.unwrap();
        assert_eq!(view.lines.len(), 1);
        assert_eq!(view.lines[0].quantity, 1);
    }

    #[tokio::test]
    async fn unknown_product_cannot_be_added() {
        let (store, _) = seeded_store().await;
        let session = customer_session();
        let err = add_to_cart(&store, &session, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound("product")));
    }

    #[tokio::test]
    async fn inactive_product_cannot_be_added() {
        let (store, _) = seeded_store().await;
        let session = customer_session();
        let mut draft_product = active_product("Legacy plan", Decimal::new(500, 2));
        draft_product.status = "draft".to_string();
        crate::store::CatalogStore::insert_product(&store, &draft_product)
            .await
            .unwrap();
        let err = add_to_cart(&store, &session, draft_product.id).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn quantity_floor_enforced() {
        let (store, products) = seeded_store().await;
        let session = customer_session();
        let CartAdd::Added { entry_id } =
            add_to_cart(&store, &session, products[0].id).await.unwrap()
        else {
            panic!("expected a fresh entry");
        };
        assert!(change_quantity(&store, &session, entry_id, 0).await.is_err());
        assert!(change_quantity(&store, &session, entry_id, -2).await.is_err());
        change_quantity(&store, &session, entry_id, 3).await.unwrap();
        let view = view_cart(&store, &session, "USD").await.unwrap();
        assert_eq!(view.lines[0].quantity, 3);
    }

    #[tokio::test]
    async fn dangling_entries_are_skipped() {
        let (store, products) = seeded_store().await;
        let session = customer_session();
        add_to_cart(&store, &session, products[0].id).await.unwrap();
        add_to_cart(&store, &session, products[1].id).await.unwrap();
        crate::store::CatalogStore::delete_product(&store, products[0].id)
            .await
            .unwrap();
        let view = view_cart(&store, &session, "USD").await.unwrap();
        assert_eq!(view.lines.len(), 1);
        assert_eq!(view.lines[0].product_id, products[1].id);
        // the dangling row itself still exists in the ledger
        assert_eq!(store.entries_for_user(session.user_id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn wishlist_is_independent_of_cart() {
        let (store, products) = seeded_store().await;
        let session = customer_session();
        toggle_wishlist(&store, &session, products[0].id).await.unwrap();
        add_to_cart(&store, &session, products[0].id).await.unwrap();
        let change = toggle_wishlist(&store, &session, products[0].id).await.unwrap();
        assert!(matches!(change, WishlistChange::Removed));
        // removing from the wishlist leaves the cart alone
        let view = view_cart(&store, &session, "USD").await.unwrap();
        assert_eq!(view.lines.len(), 1);
    }

    #[tokio::test]
    async fn carts_are_per_user() {
        let (store, products) = seeded_store().await;
        let ada = customer_session();
        let ben = Session::new(Uuid::new_v4(), "ben@example.com", Role::Customer);
        add_to_cart(&store, &ada, products[0].id).await.unwrap();
        let view = view_cart(&store, &ben, "USD").await.unwrap();
        assert!(view.lines.is_empty());
    }
}
