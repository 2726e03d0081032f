//! Request extractors.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use bodyscan_core::AppError;

use crate::constants::OWNER_HEADER;
use crate::error::HttpAppError;

/// Caller identity taken from the `X-User-Id` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner(pub String);

impl Owner {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Extracted from parts so it composes with Multipart.
impl<S> FromRequestParts<S> for Owner
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(OWNER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| Owner(value.to_string()))
            .ok_or_else(|| {
                HttpAppError(AppError::Unauthorized("User ID required".to_string()))
            })
    }
}
