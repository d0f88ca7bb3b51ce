//! Admin console operations: catalog CRUD, the user directory, and sample
//! data seeding.

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::alert::{Alert, AlertKind, AlertPayload, AlertPriority};
use crate::domain::cart::CartLine;
use crate::domain::catalog::{Product, ProductInput, ProductStatus};
use crate::domain::checkout::{CheckoutDraft, StepInput};
use crate::domain::events::{self, DomainEvent};
use crate::domain::order::Order;
use crate::domain::payment::{charge_amounts, new_transaction_id};
use crate::domain::user::{Role, User};
use crate::domain::value_objects::{Money, Urgency};
use crate::error::{ApiError, ApiResult};
use crate::session::Session;
use crate::store::Store;

pub async fn create_product(
    store: &dyn Store,
    nats: Option<&async_nats::Client>,
    session: &Session,
    input: ProductInput,
) -> ApiResult<Product> {
    session.require_admin()?;
    input.check().map_err(ApiError::Validation)?;
    let product = input.into_product(Uuid::new_v4(), Utc::now());
    store.insert_product(&product).await?;
    tracing::info!(product_id = %product.id, name = %product.name, "product created");
    events::publish(
        nats,
        &DomainEvent::ProductCreated { product_id: product.id, name: product.name.clone() },
    )
    .await;
    Ok(product)
}

pub async fn update_product(
    store: &dyn Store,
    session: &Session,
    id: Uuid,
    input: ProductInput,
) -> ApiResult<Product> {
    session.require_admin()?;
    input.check().map_err(ApiError::Validation)?;
    let existing = store.product(id).await?.ok_or(ApiError::NotFound("product"))?;
    let mut product = input.into_product(id, Utc::now());
    product.created_at = existing.created_at;
    store.update_product(&product).await?;
    Ok(product)
}

pub async fn delete_product(store: &dyn Store, session: &Session, id: Uuid) -> ApiResult<()> {
    session.require_admin()?;
    store.delete_product(id).await?;
    tracing::info!(product_id = %id, "product deleted");
    Ok(())
}

/// Full catalog including drafts and inactive entries (admin view).
pub async fn list_all_products(store: &dyn Store, session: &Session) -> ApiResult<Vec<Product>> {
    session.require_admin()?;
    Ok(store.products_by_status(None).await?)
}

pub async fn list_users(store: &dyn Store, session: &Session) -> ApiResult<Vec<User>> {
    session.require_admin()?;
    Ok(store.list_users().await?)
}

/// Seeds a handful of catalog entries and demo accounts. Idempotent for
/// users (upsert), additive for products.
pub async fn seed_catalog(
    store: &dyn Store,
    nats: Option<&async_nats::Client>,
    session: &Session,
) -> ApiResult<Vec<Product>> {
    session.require_admin()?;
    let samples = [
        ("Managed VPS", Decimal::new(2999, 2), "hosting", Some("vps")),
        ("Business email suite", Decimal::new(1000, 2), "hosting", Some("email")),
        ("Custom website build", Decimal::new(49900, 2), "development", Some("web")),
        ("SSL certificate", Decimal::new(899, 2), "security", None),
    ];
    let mut created = Vec::with_capacity(samples.len());
    for (name, price, category, subcategory) in samples {
        let input = ProductInput {
            name: name.to_string(),
            description: Some(format!("{name} (sample data)")),
            price,
            original_price: None,
            category: category.to_string(),
            subcategory: subcategory.map(str::to_string),
            stock: 100,
            status: ProductStatus::Active,
            features: vec!["24/7 support".to_string()],
            tags: vec!["sample".to_string()],
        };
        created.push(create_product(store, nats, session, input).await?);
    }
    for (email, role) in [("demo@hostforge.dev", Role::Customer), ("ops@hostforge.dev", Role::Admin)] {
        let user = User {
            id: Uuid::new_v5(&Uuid::NAMESPACE_URL, email.as_bytes()),
            email: email.to_string(),
            role: role.as_str().to_string(),
            created_at: Utc::now(),
        };
        store.upsert_user(&user).await?;
    }
    Ok(created)
}

/// Seeds the calling user's dashboard with sample alerts and one completed
/// order, for demo walkthroughs.
pub async fn seed_dashboard(store: &dyn Store, session: &Session) -> ApiResult<Order> {
    let now = Utc::now();
    let welcome = AlertPayload {
        title: "Welcome to HostForge".to_string(),
        message: "Your demo dashboard is ready.".to_string(),
        kind: AlertKind::Success,
        priority: AlertPriority::Normal,
        action_url: Some("/orders".to_string()),
        action_text: Some("View orders".to_string()),
    };
    let maintenance = AlertPayload {
        title: "Maintenance notice".to_string(),
        message: "Sample maintenance window announcement.".to_string(),
        kind: AlertKind::Info,
        priority: AlertPriority::Low,
        action_url: None,
        action_text: None,
    };
    for payload in [&welcome, &maintenance] {
        store
            .insert_alert(&Alert::for_recipient(session.user_id, payload, now))
            .await?;
    }

    let lines = vec![CartLine {
        entry_id: Uuid::new_v4(),
        product_id: Uuid::new_v4(),
        product_name: "Managed VPS".to_string(),
        category: "hosting".to_string(),
        quantity: 1,
        unit_price: Decimal::new(2999, 2),
    }];
    let mut draft = CheckoutDraft::begin(session.user_id, lines, "USD")?;
    draft.submit_step(StepInput::PersonalInfo(crate::domain::checkout::PersonalInfo {
        first_name: "Demo".to_string(),
        last_name: "User".to_string(),
        email: if session.email.is_empty() { "demo@hostforge.dev".to_string() } else { session.email.clone() },
        phone: "+10000000000".to_string(),
        date_of_birth: "1990-01-01".to_string(),
    }))?;
    draft.submit_step(StepInput::Address(crate::domain::checkout::ShippingAddress {
        street: "1 Demo Way".to_string(),
        city: "Springfield".to_string(),
        state: "IL".to_string(),
        postal_code: "62701".to_string(),
        country: "US".to_string(),
    }))?;
    draft.submit_step(StepInput::ServiceDetails(crate::domain::checkout::ServiceDetails {
        project_description: "Sample hosting setup".to_string(),
        delivery_timeline: "1 week".to_string(),
        urgency: Urgency::Standard,
        communication_preference: "email".to_string(),
    }))?;

    let breakdown = charge_amounts(&Money::new(draft.subtotal, "USD"), draft.urgency());
    let order = Order::from_draft(&draft, breakdown, new_transaction_id())?;
    store.create_order(&order).await?;
    tracing::info!(user_id = %session.user_id, order_id = %order.order_id, "demo dashboard seeded");
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testing::{admin_session, customer_session, seeded_store};
    use crate::store::{AlertStore, OrderStore};

    fn plan(name: &str) -> ProductInput {
        ProductInput {
            name: name.to_string(),
            description: None,
            price: Decimal::new(1500, 2),
            original_price: Some(Decimal::new(2000, 2)),
            category: "hosting".to_string(),
            subcategory: None,
            stock: 5,
            status: ProductStatus::Active,
            features: vec![],
            tags: vec![],
        }
    }

    #[tokio::test]
    async fn product_crud_requires_admin() {
        let (store, _) = seeded_store().await;
        let customer = customer_session();
        assert!(matches!(
            create_product(&store, None, &customer, plan("Starter")).await.unwrap_err(),
            ApiError::Forbidden
        ));
        assert!(list_users(&store, &customer).await.is_err());
    }

    #[tokio::test]
    async fn create_update_delete_round_trip() {
        let (store, _) = seeded_store().await;
        let admin = admin_session();
        let product = create_product(&store, None, &admin, plan("Starter")).await.unwrap();

        let mut changed = plan("Starter Plus");
        changed.price = Decimal::new(1800, 2);
        let updated = update_product(&store, &admin, product.id, changed).await.unwrap();
        assert_eq!(updated.name, "Starter Plus");
        assert_eq!(updated.created_at, product.created_at);

        delete_product(&store, &admin, product.id).await.unwrap();
        assert!(matches!(
            delete_product(&store, &admin, product.id).await.unwrap_err(),
            ApiError::NotFound("product")
        ));
    }

    #[tokio::test]
    async fn invalid_product_input_rejected() {
        let (store, _) = seeded_store().await;
        let admin = admin_session();
        let mut bad = plan("");
        bad.price = Decimal::new(-5, 0);
        assert!(create_product(&store, None, &admin, bad).await.is_err());
    }

    #[tokio::test]
    async fn admin_listing_includes_drafts() {
        let (store, products) = seeded_store().await;
        let admin = admin_session();
        let mut draft = plan("Unreleased plan");
        draft.status = ProductStatus::Draft;
        create_product(&store, None, &admin, draft).await.unwrap();
        let all = list_all_products(&store, &admin).await.unwrap();
        assert_eq!(all.len(), products.len() + 1);
    }

    #[tokio::test]
    async fn dashboard_seeding_writes_alerts_and_an_order() {
        let (store, _) = seeded_store().await;
        let session = customer_session();
        let order = seed_dashboard(&store, &session).await.unwrap();
        assert_eq!(order.user_id, session.user_id);
        assert_eq!(store.alerts_for_user(session.user_id).await.unwrap().len(), 2);
        assert_eq!(
            store.orders_for_user(session.user_id, None, None).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn catalog_seeding_is_admin_only_and_additive() {
        let (store, products) = seeded_store().await;
        assert!(seed_catalog(&store, None, &customer_session()).await.is_err());
        let created = seed_catalog(&store, None, &admin_session()).await.unwrap();
        assert_eq!(created.len(), 4);
        let admin = admin_session();
        let all = list_all_products(&store, &admin).await.unwrap();
        assert_eq!(all.len(), products.len() + 4);
        let users = list_users(&store, &admin).await.unwrap();
        assert_eq!(users.len(), 2);
    }
}
