//! Cart API

mod handler;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/cart", cart_routes())
}

fn cart_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::get_cart).delete(handler::clear))
        .route("/add", post(handler::add))
        .route("/items/{key}", put(handler::update_item).delete(handler::remove_item))
        .route("/clear", delete(handler::clear))
}
