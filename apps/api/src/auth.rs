//! Caller identity. Sessions are issued upstream; this API only trusts the
//! owner UUID forwarded in the `x-user-id` header.

use axum::{extract::FromRequestParts, http::request::Parts};
use resume_model::OwnerId;

use crate::errors::AppError;

pub const OWNER_HEADER: &str = "x-user-id";

/// Extractor that rejects with 401 when the header is missing or not a UUID.
#[derive(Debug, Clone, Copy)]
pub struct CurrentOwner(pub OwnerId);

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentOwner
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(OWNER_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<OwnerId>().ok())
            .map(CurrentOwner)
            .ok_or(AppError::Unauthorized)
    }
}
