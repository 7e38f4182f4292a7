//! Dashboard statistics API (admin-only)

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/stats", stats_routes())
}

fn stats_routes() -> Router<ServerState> {
    Router::new()
        .route("/dashboard", get(handler::dashboard))
        .route("/recent-sales", get(handler::recent_sales))
        .route("/sales-by-day", get(handler::sales_by_day))
        .route_layer(middleware::from_fn(require_admin))
}
