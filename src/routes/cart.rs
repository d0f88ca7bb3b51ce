//! Cart and wishlist endpoints, all scoped to the requesting session.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::catalog::Product;
use crate::error::ApiResult;
use crate::service::cart as service;
use crate::session::Session;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct AddRequest {
    pub product_id: Uuid,
}

pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<AddRequest>,
) -> ApiResult<(StatusCode, Json<service::CartAdd>)> {
    let outcome = service::add_to_cart(state.store.as_ref(), &session, req.product_id).await?;
    let status = match outcome {
        service::CartAdd::Added { .. } => StatusCode::CREATED,
        service::CartAdd::AlreadyInCart => StatusCode::OK,
    };
    Ok((status, Json(outcome)))
}

pub async fn view(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<service::CartView>> {
    let view = service::view_cart(state.store.as_ref(), &session, &state.currency).await?;
    Ok(Json(view))
}

#[derive(Deserialize)]
pub struct QuantityRequest {
    pub quantity: i32,
}

pub async fn set_quantity(
    State(state): State<AppState>,
    session: Session,
    Path(entry_id): Path<Uuid>,
    Json(req): Json<QuantityRequest>,
) -> ApiResult<StatusCode> {
    service::change_quantity(state.store.as_ref(), &session, entry_id, req.quantity).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Path(entry_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    service::remove_from_cart(state.store.as_ref(), &session, entry_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct ToggleRequest {
    pub product_id: Uuid,
}

pub async fn toggle_wishlist(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<ToggleRequest>,
) -> ApiResult<Json<service::WishlistChange>> {
    let change = service::toggle_wishlist(state.store.as_ref(), &session, req.product_id).await?;
    Ok(Json(change))
}

pub async fn wishlist(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<Vec<Product>>> {
    let products = service::view_wishlist(state.store.as_ref(), &session).await?;
    Ok(Json(products))
}
