//! Order archive queries: history and receipts.

use crate::domain::order::{Order, PaymentStatus};
use crate::error::{ApiError, ApiResult};
use crate::session::Session;
use crate::store::Store;

pub async fn history(
    store: &dyn Store,
    session: &Session,
    status: Option<PaymentStatus>,
    search: Option<&str>,
) -> ApiResult<Vec<Order>> {
    Ok(store.orders_for_user(session.user_id, status, search).await?)
}

pub async fn receipt(store: &dyn Store, session: &Session, order_id: &str) -> ApiResult<Order> {
    store
        .order_for_user(session.user_id, order_id)
        .await?
        .ok_or(ApiError::NotFound("order"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::checkout::tests::complete_draft;
    use crate::domain::order::PaymentStatus;
    use crate::domain::payment::charge_amounts;
    use crate::domain::value_objects::{Money, Urgency};
    use crate::domain::user::Role;
    use crate::service::testing::seeded_store;
    use crate::store::OrderStore;
    use uuid::Uuid;

    async fn archive_order(store: &crate::store::MemStore, session: &Session) -> Order {
        let mut draft = complete_draft(Urgency::Standard);
        draft.user_id = session.user_id;
        let breakdown = charge_amounts(&Money::usd(draft.subtotal), Urgency::Standard);
        let order =
            Order::from_draft(&draft, breakdown, crate::domain::payment::new_transaction_id())
                .unwrap();
        store.create_order(&order).await.unwrap();
        order
    }

    #[tokio::test]
    async fn history_filters_by_status_and_order_id() {
        let (store, _) = seeded_store().await;
        let session = Session::new(Uuid::new_v4(), "ada@example.com", Role::Customer);
        let first = archive_order(&store, &session).await;
        archive_order(&store, &session).await;

        let all = history(&store, &session, None, None).await.unwrap();
        assert_eq!(all.len(), 2);

        let completed = history(&store, &session, Some(PaymentStatus::Completed), None)
            .await
            .unwrap();
        assert_eq!(completed.len(), 2);

        let refunded = history(&store, &session, Some(PaymentStatus::Refunded), None)
            .await
            .unwrap();
        assert!(refunded.is_empty());

        let searched = history(&store, &session, None, Some(&first.order_id))
            .await
            .unwrap();
        assert_eq!(searched.len(), 1);
        assert_eq!(searched[0].order_id, first.order_id);
    }

    #[tokio::test]
    async fn receipt_is_owner_scoped() {
        let (store, _) = seeded_store().await;
        let session = Session::new(Uuid::new_v4(), "ada@example.com", Role::Customer);
        let order = archive_order(&store, &session).await;

        assert_eq!(
            receipt(&store, &session, &order.order_id).await.unwrap().order_id,
            order.order_id
        );

        let stranger = Session::new(Uuid::new_v4(), "eve@example.com", Role::Customer);
        let err = receipt(&store, &stranger, &order.order_id).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound("order")));
    }
}
