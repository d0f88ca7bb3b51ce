//! Public catalog endpoints. Browsing does not require a session; only
//! active products are visible here.

use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use crate::domain::catalog::{Product, ProductStatus};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub async fn list_products(State(state): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    let products = state
        .store
        .products_by_status(Some(ProductStatus::Active))
        .await?;
    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Product>> {
    let product = state
        .store
        .product(id)
        .await?
        .filter(Product::is_active)
        .ok_or(ApiError::NotFound("product"))?;
    Ok(Json(product))
}
