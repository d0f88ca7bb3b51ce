//! Unified error type for the HTTP boundary.
//!
//! Every handler returns `Result<T, ApiError>`. Validation problems carry
//! enough detail for inline display; internal store errors are logged and
//! masked. A payment decline is an expected, retryable outcome and is
//! reported as such.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::domain::alert::AlertError;
use crate::domain::checkout::CheckoutError;
use crate::domain::payment::{CardError, DeclineReason};
use crate::domain::value_objects::QuantityError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{field}: {message}")]
    CardField { field: &'static str, message: String },
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("admin access required")]
    Forbidden,
    #[error("payment declined: {0}")]
    PaymentDeclined(DeclineReason),
    #[error("storage error: {0}")]
    Storage(StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Storage(err) = &self {
            tracing::error!(error = %err, "request failed on storage");
        }
        let (status, body) = match &self {
            ApiError::Validation(message) => {
                (StatusCode::BAD_REQUEST, json!({ "error": message }))
            }
            ApiError::CardField { field, message } => (
                StatusCode::BAD_REQUEST,
                json!({ "error": message, "field": field }),
            ),
            ApiError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                json!({ "error": format!("{what} not found") }),
            ),
            ApiError::Unauthorized(message) => {
                (StatusCode::UNAUTHORIZED, json!({ "error": message }))
            }
            ApiError::Forbidden => (
                StatusCode::FORBIDDEN,
                json!({ "error": "admin access required" }),
            ),
            ApiError::PaymentDeclined(reason) => (
                StatusCode::PAYMENT_REQUIRED,
                json!({ "error": reason.to_string(), "retryable": true }),
            ),
            ApiError::Storage(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "internal server error" }),
            ),
        };
        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => ApiError::NotFound(what),
            other => ApiError::Storage(other),
        }
    }
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<CardError> for ApiError {
    fn from(err: CardError) -> Self {
        ApiError::CardField { field: err.field(), message: err.to_string() }
    }
}

impl From<DeclineReason> for ApiError {
    fn from(reason: DeclineReason) -> Self {
        ApiError::PaymentDeclined(reason)
    }
}

impl From<AlertError> for ApiError {
    fn from(err: AlertError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<QuantityError> for ApiError {
    fn from(err: QuantityError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_not_found_maps_to_not_found() {
        let err: ApiError = StoreError::NotFound("cart entry").into();
        assert!(matches!(err, ApiError::NotFound("cart entry")));
    }

    #[test]
    fn card_error_keeps_its_field() {
        let err: ApiError = CardError::InvalidCvv.into();
        match err {
            ApiError::CardField { field, .. } => assert_eq!(field, "cvv"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
