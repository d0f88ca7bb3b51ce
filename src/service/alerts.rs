//! Bulk alert fan-out and the recipient inbox.

use chrono::Utc;
use uuid::Uuid;

use crate::domain::alert::{Alert, AlertPayload, BroadcastReport, FailedDelivery};
use crate::domain::events::{self, DomainEvent};
use crate::error::ApiResult;
use crate::session::Session;
use crate::store::Store;

/// Fans one payload out to every recipient, one alert row each. The payload
/// is validated as a whole before the first write; after that each recipient
/// write is independent and best-effort, and the report says which ones
/// landed.
pub async fn send_bulk(
    store: &dyn Store,
    nats: Option<&async_nats::Client>,
    session: &Session,
    recipients: &[Uuid],
    payload: &AlertPayload,
) -> ApiResult<BroadcastReport> {
    session.require_admin()?;
    payload.check(recipients)?;

    let now = Utc::now();
    let mut report = BroadcastReport::default();
    for &recipient in recipients {
        let alert = Alert::for_recipient(recipient, payload, now);
        match store.insert_alert(&alert).await {
            Ok(()) => report.delivered.push(recipient),
            Err(err) => {
                tracing::warn!(%err, user_id = %recipient, "alert delivery failed");
                report.failed.push(FailedDelivery {
                    user_id: recipient,
                    reason: err.to_string(),
                });
            }
        }
    }
    tracing::info!(
        title = %payload.title,
        delivered = report.delivered.len(),
        failed = report.failed.len(),
        "alert broadcast finished"
    );
    events::publish(
        nats,
        &DomainEvent::AlertBroadcast {
            title: payload.title.clone(),
            delivered: report.delivered.len(),
            failed: report.failed.len(),
        },
    )
    .await;
    Ok(report)
}

pub async fn inbox(store: &dyn Store, session: &Session) -> ApiResult<Vec<Alert>> {
    Ok(store.alerts_for_user(session.user_id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::alert::{AlertKind, AlertPriority};
    use crate::domain::user::Role;
    use crate::error::ApiError;
    use crate::service::testing::{admin_session, customer_session, seeded_store, FaultyStore};

    fn payload() -> AlertPayload {
        AlertPayload {
            title: "Scheduled maintenance".to_string(),
            message: "Control panel unavailable 02:00-02:30 UTC".to_string(),
            kind: AlertKind::Warning,
            priority: AlertPriority::High,
            action_url: Some("/status".to_string()),
            action_text: Some("View status".to_string()),
        }
    }

    #[tokio::test]
    async fn fan_out_writes_one_alert_per_recipient() {
        let (store, _) = seeded_store().await;
        let admin = admin_session();
        let recipients = [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];

        let report = send_bulk(&store, None, &admin, &recipients, &payload())
            .await
            .unwrap();
        assert_eq!(report.delivered.len(), 3);
        assert!(report.failed.is_empty());

        for recipient in recipients {
            let session = Session::new(recipient, "", Role::Customer);
            let alerts = inbox(&store, &session).await.unwrap();
            assert_eq!(alerts.len(), 1);
            assert_eq!(alerts[0].title, "Scheduled maintenance");
            assert_eq!(alerts[0].kind, AlertKind::Warning);
            assert_eq!(alerts[0].priority, AlertPriority::High);
        }
    }

    #[tokio::test]
    async fn oversized_title_rejected_before_any_write() {
        let (store, _) = seeded_store().await;
        let admin = admin_session();
        let recipients = [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
        let mut bad = payload();
        bad.title = "x".repeat(101);

        let err = send_bulk(&store, None, &admin, &recipients, &bad)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        for recipient in recipients {
            let session = Session::new(recipient, "", Role::Customer);
            assert!(inbox(&store, &session).await.unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn failed_recipient_is_reported_and_the_rest_still_land() {
        let (inner, _) = seeded_store().await;
        let admin = admin_session();
        let recipients = [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
        let mut store = FaultyStore::wrapping(inner);
        store.fail_alert_for = Some(recipients[1]);

        let report = send_bulk(&store, None, &admin, &recipients, &payload())
            .await
            .unwrap();
        assert_eq!(report.delivered, vec![recipients[0], recipients[2]]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].user_id, recipients[1]);

        for recipient in [recipients[0], recipients[2]] {
            let session = Session::new(recipient, "", Role::Customer);
            assert_eq!(inbox(&store, &session).await.unwrap().len(), 1);
        }
        let unlucky = Session::new(recipients[1], "", Role::Customer);
        assert!(inbox(&store, &unlucky).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn broadcast_requires_admin() {
        let (store, _) = seeded_store().await;
        let customer = customer_session();
        let err = send_bulk(&store, None, &customer, &[Uuid::new_v4()], &payload())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden));
    }

    #[tokio::test]
    async fn empty_recipient_list_rejected() {
        let (store, _) = seeded_store().await;
        let admin = admin_session();
        assert!(send_bulk(&store, None, &admin, &[], &payload()).await.is_err());
    }
}
