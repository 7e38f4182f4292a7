//! Authenticated-user extractor

use axum::{extract::FromRequestParts, http::request::Parts};

use super::jwt::Claims;
use crate::utils::AppError;

/// The authenticated caller, taken from the claims that `require_auth`
/// injected. Handlers that declare this parameter can only be reached
/// through the auth middleware.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub is_admin: bool,
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts
            .extensions
            .get::<Claims>()
            .ok_or(AppError::Unauthorized)?;
        Ok(Self {
            id: claims.user_id()?,
            username: claims.username.clone(),
            is_admin: claims.is_admin,
        })
    }
}
