//! HTTP surface: thin handlers over the service layer.

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod orders;

use axum::routing::{get, patch, post, put};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/products", get(catalog::list_products))
        .route("/api/v1/products/:id", get(catalog::get_product))
        .route("/api/v1/cart", get(cart::view).post(cart::add))
        .route("/api/v1/cart/:entry_id", patch(cart::set_quantity).delete(cart::remove))
        .route("/api/v1/wishlist", get(cart::wishlist))
        .route("/api/v1/wishlist/toggle", post(cart::toggle_wishlist))
        .route("/api/v1/checkout/draft", post(checkout::begin))
        .route("/api/v1/checkout/draft/:id", get(checkout::review))
        .route("/api/v1/checkout/draft/:id/step", post(checkout::submit_step))
        .route("/api/v1/checkout/draft/:id/back", post(checkout::step_back))
        .route("/api/v1/checkout/draft/:id/pay", post(checkout::pay))
        .route("/api/v1/orders", get(orders::history))
        .route("/api/v1/orders/:order_id", get(orders::receipt))
        .route("/api/v1/alerts", get(orders::alert_inbox))
        .route("/api/v1/admin/products", get(admin::list_products).post(admin::create_product))
        .route(
            "/api/v1/admin/products/:id",
            put(admin::update_product).delete(admin::delete_product),
        )
        .route("/api/v1/admin/users", get(admin::list_users))
        .route("/api/v1/admin/alerts", post(admin::broadcast_alert))
        .route("/api/v1/admin/seed", post(admin::seed_catalog))
        .route("/api/demo-dashboard", post(admin::seed_dashboard))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy", "service": "hostforge-commerce" }))
}
