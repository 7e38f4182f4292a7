//! Authentication middleware
//!
//! `require_auth` runs on the whole `/api` router and injects [`Claims`]
//! into request extensions; the storefront read endpoints and the auth
//! entry points are exempt. `require_admin` is layered on admin routers
//! and checks the injected claims.

use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::Response,
};

use super::jwt::Claims;
use crate::core::state::ServerState;
use crate::utils::AppError;

/// Paths reachable without a token.
fn is_public(method: &Method, path: &str) -> bool {
    if method == Method::OPTIONS {
        return true;
    }
    if !path.starts_with("/api") {
        return true;
    }
    if matches!(
        path,
        "/api/auth/login" | "/api/auth/register" | "/api/auth/refresh" | "/api/health"
    ) {
        return true;
    }
    // storefront browsing is anonymous
    if method == Method::GET
        && (path == "/api/products"
            || path.starts_with("/api/products/")
            || path == "/api/categories"
            || path.starts_with("/api/categories/"))
    {
        return true;
    }
    false
}

fn extract_bearer(request: &Request) -> Result<&str, AppError> {
    request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(AppError::Unauthorized)
}

pub async fn require_auth(
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if is_public(request.method(), request.uri().path()) {
        return Ok(next.run(request).await);
    }

    let token = extract_bearer(&request)?;
    let claims = state.jwt_service.verify_token(token, "access")?;
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

pub async fn require_admin(request: Request, next: Next) -> Result<Response, AppError> {
    let claims = request
        .extensions()
        .get::<Claims>()
        .ok_or(AppError::Unauthorized)?;
    if !claims.is_admin {
        return Err(AppError::forbidden("Administrator privileges required"));
    }
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_paths() {
        assert!(is_public(&Method::POST, "/api/auth/login"));
        assert!(is_public(&Method::GET, "/api/products"));
        assert!(is_public(&Method::GET, "/api/products/3"));
        assert!(is_public(&Method::GET, "/api/categories"));
        assert!(is_public(&Method::OPTIONS, "/api/sales"));
    }

    #[test]
    fn test_protected_paths() {
        assert!(!is_public(&Method::POST, "/api/products"));
        assert!(!is_public(&Method::GET, "/api/sales"));
        assert!(!is_public(&Method::GET, "/api/users"));
        assert!(!is_public(&Method::DELETE, "/api/categories/2"));
        assert!(!is_public(&Method::GET, "/api/cart"));
    }
}
