//! Request identity. The hosted auth platform terminates authentication
//! upstream and forwards the verified identity in headers; this service
//! never sees credentials.
//!
//! The session is an explicit value passed into every operation, so the core
//! stays testable without any HTTP machinery.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::domain::user::Role;
use crate::error::ApiError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_EMAIL_HEADER: &str = "x-user-email";
pub const USER_ROLE_HEADER: &str = "x-user-role";

#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
}

impl Session {
    pub fn new(user_id: Uuid, email: impl Into<String>, role: Role) -> Self {
        Self { user_id, email: email.into(), role }
    }

    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(ApiError::Forbidden)
        }
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let user_id = header(USER_ID_HEADER)
            .ok_or_else(|| ApiError::Unauthorized("missing identity".to_string()))?;
        let user_id = user_id
            .parse::<Uuid>()
            .map_err(|_| ApiError::Unauthorized("malformed user id".to_string()))?;
        let email = header(USER_EMAIL_HEADER).unwrap_or_default();
        let role = header(USER_ROLE_HEADER)
            .map(|r| Role::parse(&r))
            .unwrap_or_default();
        Ok(Session::new(user_id, email, role))
    }
}
