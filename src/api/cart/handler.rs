//! Cart handlers
//!
//! All operations work on the authenticated caller's own cart. Inputs
//! arrive as query parameters; names match the storefront wire format.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::cart::{CartAction, CartItem, ProductSnapshot};
use crate::core::ServerState;
use crate::utils::{AppError, AppResult, MessageResponse, money, validation};

#[derive(Debug, Deserialize)]
pub struct AddParams {
    #[serde(rename = "producto_id")]
    pub product_id: i64,
    #[serde(rename = "cantidad", default = "default_quantity")]
    pub quantity: i64,
    #[serde(rename = "color_seleccionado")]
    pub color: Option<String>,
    #[serde(rename = "talla_seleccionada")]
    pub size: Option<String>,
}

fn default_quantity() -> i64 {
    1
}

#[derive(Debug, Deserialize)]
pub struct UpdateParams {
    #[serde(rename = "accion")]
    pub action: CartAction,
}

#[derive(Debug, Serialize)]
pub struct CartEntryView {
    pub key: String,
    #[serde(flatten)]
    pub item: CartItem,
    pub subtotal: f64,
}

#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartEntryView>,
    pub total: f64,
    /// Total units across all entries
    pub count: i64,
}

fn cart_view(state: &ServerState, user_id: i64) -> AppResult<CartView> {
    let mut items = Vec::new();
    for item in state.cart.get(user_id) {
        let subtotal = item.subtotal()?;
        let key = crate::cart::entry_key(item.product_id, item.color.as_deref(), item.size.as_deref());
        items.push(CartEntryView {
            key,
            item,
            subtotal,
        });
    }
    let total = money::sum2(items.iter().map(|entry| entry.subtotal));
    let count = items.iter().map(|entry| entry.item.quantity).sum();
    Ok(CartView { items, total, count })
}

/// GET /api/cart - current entries with subtotals and total
pub async fn get_cart(
    State(state): State<ServerState>,
    current: CurrentUser,
) -> AppResult<Json<CartView>> {
    Ok(Json(cart_view(&state, current.id)?))
}

/// POST /api/cart/add - add a product variant, merging quantities
pub async fn add(
    State(state): State<ServerState>,
    current: CurrentUser,
    Query(params): Query<AddParams>,
) -> AppResult<Json<CartView>> {
    validation::validate_optional_text(&params.color, "color", validation::MAX_VARIANT_LEN)?;
    validation::validate_optional_text(&params.size, "size", validation::MAX_VARIANT_LEN)?;

    let product = state
        .products()
        .find_by_id(params.product_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!("Product {} not found", params.product_id))
        })?;

    let snapshot = ProductSnapshot {
        product_id: product.id,
        name: product.name.clone(),
        price: product.price,
        image: product.image.clone(),
        stock: product.stock,
    };
    state
        .cart
        .add(current.id, &snapshot, params.quantity, params.color, params.size)?;

    Ok(Json(cart_view(&state, current.id)?))
}

/// PUT /api/cart/items/{key} - increment or decrement one entry
pub async fn update_item(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(key): Path<String>,
    Query(params): Query<UpdateParams>,
) -> AppResult<Json<CartView>> {
    state.cart.update_quantity(current.id, &key, params.action)?;
    Ok(Json(cart_view(&state, current.id)?))
}

/// DELETE /api/cart/items/{key}
pub async fn remove_item(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(key): Path<String>,
) -> AppResult<Json<CartView>> {
    state.cart.remove(current.id, &key)?;
    Ok(Json(cart_view(&state, current.id)?))
}

/// DELETE /api/cart (also /api/cart/clear)
pub async fn clear(
    State(state): State<ServerState>,
    current: CurrentUser,
) -> AppResult<Json<MessageResponse>> {
    state.cart.clear(current.id);
    Ok(Json(MessageResponse::new("Cart cleared")))
}
