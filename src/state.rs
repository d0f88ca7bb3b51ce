//! Shared application state handed to every handler.

use std::sync::Arc;

use crate::domain::payment::PaymentGateway;
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub nats: Option<async_nats::Client>,
    pub currency: String,
}

impl AppState {
    pub fn new(
        store: Arc<dyn Store>,
        gateway: Arc<dyn PaymentGateway>,
        nats: Option<async_nats::Client>,
        currency: String,
    ) -> Self {
        Self { store, gateway, nats, currency }
    }
}
