//! Order placement: the card gate, the simulated charge, and the
//! success-path writes.
//!
//! A decline performs zero writes, so retrying it is always safe. Success
//! writes the order first; clearing the cart and discarding the draft are
//! best-effort cleanup afterwards, so a cleanup failure never turns an order
//! that durably exists into an error the client would retry.

use uuid::Uuid;

use crate::domain::events::{self, DomainEvent};
use crate::domain::order::Order;
use crate::domain::payment::{charge_amounts, CardInput, PaymentGateway};
use crate::domain::value_objects::Money;
use crate::error::{ApiError, ApiResult};
use crate::session::Session;
use crate::store::Store;

pub async fn place_order(
    store: &dyn Store,
    gateway: &dyn PaymentGateway,
    nats: Option<&async_nats::Client>,
    session: &Session,
    draft_id: Uuid,
    card: CardInput,
) -> ApiResult<Order> {
    // Field validation aborts before anything else runs.
    let _card = card.validate()?;

    let draft = store
        .draft(session.user_id, draft_id)
        .await?
        .ok_or(ApiError::NotFound("checkout draft"))?;
    draft.require_ready()?;

    let subtotal = Money::new(draft.subtotal, &draft.currency);
    let breakdown = charge_amounts(&subtotal, draft.urgency());
    let total = Money::new(breakdown.total, &breakdown.currency);

    let receipt = match gateway.process(&total).await {
        Ok(receipt) => receipt,
        Err(reason) => {
            events::publish(
                nats,
                &DomainEvent::PaymentDeclined {
                    user_id: session.user_id,
                    reason: reason.to_string(),
                },
            )
            .await;
            return Err(reason.into());
        }
    };

    let order = Order::from_draft(&draft, breakdown, receipt.transaction_id)?;
    store.create_order(&order).await?;
    // The order exists from here on. Cleanup failures are logged, never
    // surfaced, because a retried placement would charge and archive twice.
    let cleared = match store.clear_for_user(session.user_id).await {
        Ok(count) => count,
        Err(err) => {
            tracing::warn!(%err, user_id = %session.user_id, "order placed but cart cleanup failed");
            0
        }
    };
    if let Err(err) = store.delete_draft(session.user_id, draft_id).await {
        tracing::warn!(%err, draft_id = %draft_id, "order placed but draft cleanup failed");
    }
    tracing::info!(
        order_id = %order.order_id,
        user_id = %session.user_id,
        total = %order.payment.total_amount,
        cleared_cart_entries = cleared,
        "order placed"
    );
    events::publish(
        nats,
        &DomainEvent::OrderPlaced {
            order_id: order.order_id.clone(),
            user_id: order.user_id,
            total: order.payment.total_amount,
            currency: order.payment.currency.clone(),
        },
    )
    .await;
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::checkout::tests::{address, personal, service as service_details};
    use crate::domain::order::PaymentStatus;
    use crate::domain::payment::{DeclineReason, ScriptedGateway};
    use crate::domain::checkout::StepInput;
    use crate::domain::value_objects::Urgency;
    use crate::service::cart::{add_to_cart, change_quantity, view_cart};
    use crate::service::checkout;
    use crate::service::testing::{card, customer_session, seeded_store, FaultyStore};
    use crate::store::{CartStore, DraftStore, OrderStore};
    use rust_decimal::Decimal;

    async fn ready_draft(
        store: &crate::store::MemStore,
        session: &Session,
        urgency: Urgency,
    ) -> Uuid {
        let draft = checkout::begin(store, session, "USD").await.unwrap();
        checkout::submit_step(store, session, draft.id, StepInput::PersonalInfo(personal()))
            .await
            .unwrap();
        checkout::submit_step(store, session, draft.id, StepInput::Address(address()))
            .await
            .unwrap();
        checkout::submit_step(
            store,
            session,
            draft.id,
            StepInput::ServiceDetails(service_details(urgency)),
        )
        .await
        .unwrap();
        draft.id
    }

    async fn fill_cart(store: &crate::store::MemStore, session: &Session, products: &[crate::domain::catalog::Product]) {
        add_to_cart(store, session, products[0].id).await.unwrap();
        add_to_cart(store, session, products[1].id).await.unwrap();
        let entries = store.entries_for_user(session.user_id).await.unwrap();
        let second = entries.iter().find(|e| e.product_id == products[1].id).unwrap();
        change_quantity(store, session, second.id, 3).await.unwrap();
    }

    #[tokio::test]
    async fn success_creates_order_and_empties_cart() {
        let (store, products) = seeded_store().await;
        let session = customer_session();
        fill_cart(&store, &session, &products).await;
        let draft_id = ready_draft(&store, &session, Urgency::Expedited).await;

        let gateway = ScriptedGateway { outcome: Ok(()) };
        let order = place_order(&store, &gateway, None, &session, draft_id, card())
            .await
            .unwrap();

        assert_eq!(order.payment.subtotal, Decimal::new(5999, 2));
        assert_eq!(order.payment.total_amount, "74.9875".parse::<Decimal>().unwrap());
        assert_eq!(order.payment.payment_status, PaymentStatus::Completed);
        assert_eq!(order.payment.transaction_id, "TXN-00000042");
        assert_eq!(order.items.len(), 2);

        // exactly one order in the archive
        let archived = store
            .orders_for_user(session.user_id, None, None)
            .await
            .unwrap();
        assert_eq!(archived.len(), 1);

        // no cart entry survives
        let view = view_cart(&store, &session, "USD").await.unwrap();
        assert!(view.lines.is_empty());
        assert!(store.entries_for_user(session.user_id).await.unwrap().is_empty());

        // draft discarded
        assert!(store.draft(session.user_id, draft_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn cart_cleanup_failure_does_not_fail_a_placed_order() {
        let (inner, products) = seeded_store().await;
        let session = customer_session();
        fill_cart(&inner, &session, &products).await;
        let draft_id = ready_draft(&inner, &session, Urgency::Standard).await;

        let mut store = FaultyStore::wrapping(inner);
        store.fail_cart_clear = true;
        let gateway = ScriptedGateway { outcome: Ok(()) };
        let order = place_order(&store, &gateway, None, &session, draft_id, card())
            .await
            .unwrap();

        // the order is durable and reported as placed, exactly once
        let archived = store
            .orders_for_user(session.user_id, None, None)
            .await
            .unwrap();
        assert_eq!(archived.len(), 1);
        assert_eq!(archived[0].order_id, order.order_id);

        // cleanup was skipped, not surfaced: the cart rows are still there
        assert!(!store.entries_for_user(session.user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn decline_leaves_no_residual_state() {
        let (store, products) = seeded_store().await;
        let session = customer_session();
        fill_cart(&store, &session, &products).await;
        let draft_id = ready_draft(&store, &session, Urgency::Standard).await;
        let before = store.entries_for_user(session.user_id).await.unwrap();

        let gateway = ScriptedGateway { outcome: Err(DeclineReason::CardDeclined) };
        let err = place_order(&store, &gateway, None, &session, draft_id, card())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::PaymentDeclined(DeclineReason::CardDeclined)));

        // zero orders, identical cart, draft retained for retry
        assert!(store
            .orders_for_user(session.user_id, None, None)
            .await
            .unwrap()
            .is_empty());
        let after = store.entries_for_user(session.user_id).await.unwrap();
        assert_eq!(before, after);
        assert!(store.draft(session.user_id, draft_id).await.unwrap().is_some());

        // the retry goes through
        let gateway = ScriptedGateway { outcome: Ok(()) };
        place_order(&store, &gateway, None, &session, draft_id, card())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn invalid_card_aborts_before_the_gateway() {
        let (store, products) = seeded_store().await;
        let session = customer_session();
        fill_cart(&store, &session, &products).await;
        let draft_id = ready_draft(&store, &session, Urgency::Standard).await;

        let mut bad = card();
        bad.cvv = "9".to_string();
        // gateway would approve, but validation must abort first
        let gateway = ScriptedGateway { outcome: Ok(()) };
        let err = place_order(&store, &gateway, None, &session, draft_id, bad)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::CardField { field: "cvv", .. }));
        assert!(store
            .orders_for_user(session.user_id, None, None)
            .await
            .unwrap()
            .is_empty());
        assert!(!store.entries_for_user(session.user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unfinished_draft_cannot_be_paid() {
        let (store, products) = seeded_store().await;
        let session = customer_session();
        fill_cart(&store, &session, &products).await;
        let draft = checkout::begin(&store, &session, "USD").await.unwrap();

        let gateway = ScriptedGateway { outcome: Ok(()) };
        let err = place_order(&store, &gateway, None, &session, draft.id, card())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
