//! Checkout wizard operations over the draft store.

use serde::Serialize;
use uuid::Uuid;

use crate::domain::checkout::{CheckoutDraft, CheckoutStep, StepInput};
use crate::domain::payment::{charge_amounts, PaymentBreakdown};
use crate::domain::value_objects::Money;
use crate::error::{ApiError, ApiResult};
use crate::service::cart;
use crate::session::Session;
use crate::store::Store;

/// Opens a draft over a snapshot of the current cart. The snapshot is not
/// refreshed afterwards, even if the catalog changes mid-flow.
pub async fn begin(store: &dyn Store, session: &Session, currency: &str) -> ApiResult<CheckoutDraft> {
    let view = cart::view_cart(store, session, currency).await?;
    let draft = CheckoutDraft::begin(session.user_id, view.lines, currency)?;
    store.put_draft(&draft).await?;
    tracing::info!(draft_id = %draft.id, user_id = %session.user_id, "checkout draft opened");
    Ok(draft)
}

async fn load(store: &dyn Store, session: &Session, draft_id: Uuid) -> ApiResult<CheckoutDraft> {
    store
        .draft(session.user_id, draft_id)
        .await?
        .ok_or(ApiError::NotFound("checkout draft"))
}

pub async fn submit_step(
    store: &dyn Store,
    session: &Session,
    draft_id: Uuid,
    input: StepInput,
) -> ApiResult<CheckoutDraft> {
    let mut draft = load(store, session, draft_id).await?;
    draft.submit_step(input)?;
    store.put_draft(&draft).await?;
    Ok(draft)
}

pub async fn step_back(
    store: &dyn Store,
    session: &Session,
    draft_id: Uuid,
) -> ApiResult<CheckoutDraft> {
    let mut draft = load(store, session, draft_id).await?;
    draft.step_back();
    store.put_draft(&draft).await?;
    Ok(draft)
}

/// The read-only review screen: the draft plus a recomputation of the
/// amounts that the payment step will charge.
#[derive(Debug, Serialize)]
pub struct ReviewSummary {
    pub draft: CheckoutDraft,
    pub breakdown: PaymentBreakdown,
    pub ready_for_payment: bool,
}

pub async fn review(
    store: &dyn Store,
    session: &Session,
    draft_id: Uuid,
) -> ApiResult<ReviewSummary> {
    let draft = load(store, session, draft_id).await?;
    let subtotal = Money::new(draft.subtotal, &draft.currency);
    let breakdown = charge_amounts(&subtotal, draft.urgency());
    let ready_for_payment = draft.ready_for_payment();
    Ok(ReviewSummary { draft, breakdown, ready_for_payment })
}
