//! Checkout wizard and payment endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::checkout::{CheckoutDraft, StepInput};
use crate::domain::order::Order;
use crate::domain::payment::CardInput;
use crate::error::ApiResult;
use crate::service::checkout as service;
use crate::service::payment;
use crate::session::Session;
use crate::state::AppState;

pub async fn begin(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<(StatusCode, Json<CheckoutDraft>)> {
    let draft = service::begin(state.store.as_ref(), &session, &state.currency).await?;
    Ok((StatusCode::CREATED, Json(draft)))
}

pub async fn review(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<service::ReviewSummary>> {
    let summary = service::review(state.store.as_ref(), &session, id).await?;
    Ok(Json(summary))
}

pub async fn submit_step(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(input): Json<StepInput>,
) -> ApiResult<Json<CheckoutDraft>> {
    let draft = service::submit_step(state.store.as_ref(), &session, id, input).await?;
    Ok(Json(draft))
}

pub async fn step_back(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<CheckoutDraft>> {
    let draft = service::step_back(state.store.as_ref(), &session, id).await?;
    Ok(Json(draft))
}

#[derive(Deserialize)]
pub struct PayRequest {
    pub card: CardInput,
}

pub async fn pay(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(req): Json<PayRequest>,
) -> ApiResult<(StatusCode, Json<Order>)> {
    let order = payment::place_order(
        state.store.as_ref(),
        state.gateway.as_ref(),
        state.nats.as_ref(),
        &session,
        id,
        req.card,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(order)))
}
