//! Admin console endpoints. Every handler re-checks the admin role through
//! the service layer.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::alert::{AlertPayload, BroadcastReport};
use crate::domain::catalog::{Product, ProductInput};
use crate::domain::order::Order;
use crate::domain::user::User;
use crate::error::ApiResult;
use crate::service::{admin as service, alerts};
use crate::session::Session;
use crate::state::AppState;

pub async fn create_product(
    State(state): State<AppState>,
    session: Session,
    Json(input): Json<ProductInput>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let product =
        service::create_product(state.store.as_ref(), state.nats.as_ref(), &session, input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(input): Json<ProductInput>,
) -> ApiResult<Json<Product>> {
    let product = service::update_product(state.store.as_ref(), &session, id, input).await?;
    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    service::delete_product(state.store.as_ref(), &session, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_products(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<Vec<Product>>> {
    let products = service::list_all_products(state.store.as_ref(), &session).await?;
    Ok(Json(products))
}

pub async fn list_users(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<Vec<User>>> {
    let users = service::list_users(state.store.as_ref(), &session).await?;
    Ok(Json(users))
}

#[derive(Deserialize)]
pub struct BroadcastRequest {
    pub recipients: Vec<Uuid>,
    #[serde(flatten)]
    pub payload: AlertPayload,
}

pub async fn broadcast_alert(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<BroadcastRequest>,
) -> ApiResult<Json<BroadcastReport>> {
    let report = alerts::send_bulk(
        state.store.as_ref(),
        state.nats.as_ref(),
        &session,
        &req.recipients,
        &req.payload,
    )
    .await?;
    Ok(Json(report))
}

pub async fn seed_catalog(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<(StatusCode, Json<Vec<Product>>)> {
    let created =
        service::seed_catalog(state.store.as_ref(), state.nats.as_ref(), &session).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn seed_dashboard(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<(StatusCode, Json<Order>)> {
    let order = service::seed_dashboard(state.store.as_ref(), &session).await?;
    Ok((StatusCode::CREATED, Json(order)))
}
