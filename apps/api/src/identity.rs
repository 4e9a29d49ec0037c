use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::errors::AppError;

/// Header set by the upstream gateway once the caller is authenticated.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated seeker. This service trusts the gateway and never
/// authenticates on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeekerId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for SeekerId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| Uuid::parse_str(value.trim()).ok())
            .map(SeekerId)
            .ok_or(AppError::Unauthorized)
    }
}
