//! Reporting API (admin-only)

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reports", report_routes())
}

fn report_routes() -> Router<ServerState> {
    Router::new()
        .route("/financial", get(handler::financial))
        .route("/sales-by-month", get(handler::sales_by_month))
        .route("/top-products", get(handler::top_products))
        .route("/categories", get(handler::category_performance))
        .route("/top-customers", get(handler::top_customers))
        .route("/low-stock", get(handler::low_stock))
        .route_layer(middleware::from_fn(require_admin))
}
