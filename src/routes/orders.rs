//! Order history, receipts, and the alert inbox.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::domain::alert::Alert;
use crate::domain::order::{Order, PaymentStatus};
use crate::error::{ApiError, ApiResult};
use crate::service::{alerts, orders as service};
use crate::session::Session;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct HistoryParams {
    pub status: Option<String>,
    pub search: Option<String>,
}

pub async fn history(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<HistoryParams>,
) -> ApiResult<Json<Vec<Order>>> {
    let status = params
        .status
        .as_deref()
        .map(|raw| {
            PaymentStatus::parse(raw)
                .ok_or_else(|| ApiError::Validation(format!("unknown status filter: {raw}")))
        })
        .transpose()?;
    let orders = service::history(
        state.store.as_ref(),
        &session,
        status,
        params.search.as_deref(),
    )
    .await?;
    Ok(Json(orders))
}

pub async fn receipt(
    State(state): State<AppState>,
    session: Session,
    Path(order_id): Path<String>,
) -> ApiResult<Json<Order>> {
    let order = service::receipt(state.store.as_ref(), &session, &order_id).await?;
    Ok(Json(order))
}

pub async fn alert_inbox(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<Vec<Alert>>> {
    let inbox = alerts::inbox(state.store.as_ref(), &session).await?;
    Ok(Json(inbox))
}
