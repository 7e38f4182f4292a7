//! API routes
//!
//! # Structure
//!
//! - [`health`] - liveness probe
//! - [`auth`] - register / login / refresh / me
//! - [`users`] - account administration
//! - [`products`] - catalog
//! - [`categories`] - catalog categories
//! - [`sales`] - order placement and history
//! - [`cart`] - per-user in-memory cart
//! - [`expenses`] - expense tracking
//! - [`reports`] - financial and sales aggregates
//! - [`stats`] - admin dashboard figures

pub mod auth;
pub mod cart;
pub mod categories;
pub mod expenses;
pub mod health;
pub mod products;
pub mod reports;
pub mod sales;
pub mod stats;
pub mod users;

use std::time::Duration;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

/// Assemble the full application router.
pub fn router(state: ServerState) -> Router {
    let timeout = Duration::from_millis(state.config.request_timeout_ms);

    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(users::router())
        .merge(products::router())
        .merge(categories::router())
        .merge(sales::router())
        .merge(cart::router())
        .merge(expenses::router())
        .merge(reports::router())
        .merge(stats::router())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_auth,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TimeoutLayer::new(timeout))
        .with_state(state)
}

/// Routes that mix self-service and admin access enforce the role here
/// instead of through the router-level admin layer.
pub(crate) fn ensure_admin(user: &CurrentUser) -> AppResult<()> {
    if user.is_admin {
        Ok(())
    } else {
        Err(AppError::forbidden("Administrator privileges required"))
    }
}
