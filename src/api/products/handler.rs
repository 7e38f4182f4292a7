//! Product handlers
//!
//! Reads are public (the storefront browses anonymously); every write is
//! admin-only.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::api::ensure_admin;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{
    Category, Product, ProductCreate, ProductFilter, ProductResponse, ProductUpdate,
};
use crate::utils::{AppError, AppResult, MessageResponse, money, validation};

#[derive(Debug, Default, Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct StockAdjustment {
    /// Relative change; negative values subtract, clamped at zero
    pub quantity: i64,
}

async fn with_category(state: &ServerState, product: Product) -> AppResult<ProductResponse> {
    let category: Option<Category> = match product.category_id {
        Some(category_id) => state.categories().find_by_id(category_id).await?,
        None => None,
    };
    Ok(ProductResponse::from_product(product, category))
}

fn validate_payload(
    name: Option<&str>,
    description: &Option<String>,
    price: Option<f64>,
    stock: Option<i64>,
    image: &Option<String>,
    colors: &Option<String>,
    sizes: &Option<String>,
) -> AppResult<()> {
    if let Some(name) = name {
        validation::validate_required_text(name, "name", validation::MAX_NAME_LEN)?;
    }
    validation::validate_optional_text(description, "description", validation::MAX_DESCRIPTION_LEN)?;
    validation::validate_optional_text(image, "image", validation::MAX_TEXT_FIELD_LEN)?;
    validation::validate_optional_text(colors, "colors", validation::MAX_TEXT_FIELD_LEN)?;
    validation::validate_optional_text(sizes, "sizes", validation::MAX_TEXT_FIELD_LEN)?;
    if let Some(price) = price {
        money::validate_price(price)?;
    }
    if let Some(stock) = stock
        && stock < 0
    {
        return Err(AppError::validation(format!(
            "stock must not be negative, got {stock}"
        )));
    }
    Ok(())
}

/// GET /api/products - listing with filters (public)
pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<ProductFilter>,
) -> AppResult<Json<Vec<ProductResponse>>> {
    let products = state.products().list(&filter).await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

/// GET /api/products/featured (public)
pub async fn list_featured(
    State(state): State<ServerState>,
    Query(params): Query<LimitParams>,
) -> AppResult<Json<Vec<ProductResponse>>> {
    let products = state.products().list_featured(params.limit).await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

/// GET /api/products/recent (public)
pub async fn list_recent(
    State(state): State<ServerState>,
    Query(params): Query<LimitParams>,
) -> AppResult<Json<Vec<ProductResponse>>> {
    let products = state.products().list_recent(params.limit).await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

/// GET /api/products/{id} - detail with category attached (public)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ProductResponse>> {
    let product = state
        .products()
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {id} not found")))?;
    Ok(Json(with_category(&state, product).await?))
}

/// POST /api/products (admin)
pub async fn create(
    State(state): State<ServerState>,
    current: CurrentUser,
    Json(payload): Json<ProductCreate>,
) -> AppResult<(StatusCode, Json<ProductResponse>)> {
    ensure_admin(&current)?;
    validate_payload(
        Some(&payload.name),
        &payload.description,
        Some(payload.price),
        Some(payload.stock),
        &payload.image,
        &payload.colors,
        &payload.sizes,
    )?;
    if let Some(category_id) = payload.category_id
        && state.categories().find_by_id(category_id).await?.is_none()
    {
        return Err(AppError::not_found(format!(
            "Category {category_id} not found"
        )));
    }

    let product = state.products().create(&payload).await?;
    tracing::info!(product_id = product.id, by = current.id, "Product created");
    Ok((StatusCode::CREATED, Json(product.into())))
}

/// PUT /api/products/{id} - merge-update (admin)
pub async fn update(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<ProductResponse>> {
    ensure_admin(&current)?;
    validate_payload(
        payload.name.as_deref(),
        &payload.description,
        payload.price,
        payload.stock,
        &payload.image,
        &payload.colors,
        &payload.sizes,
    )?;
    if let Some(category_id) = payload.category_id
        && state.categories().find_by_id(category_id).await?.is_none()
    {
        return Err(AppError::not_found(format!(
            "Category {category_id} not found"
        )));
    }

    let product = state.products().update(id, &payload).await?;
    Ok(Json(product.into()))
}

/// DELETE /api/products/{id} (admin)
pub async fn delete(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    ensure_admin(&current)?;
    state.products().delete(id).await?;
    tracing::info!(product_id = id, by = current.id, "Product deleted");
    Ok(Json(MessageResponse::new(format!("Product {id} deleted"))))
}

/// POST /api/products/{id}/stock - relative stock adjustment (admin)
pub async fn adjust_stock(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<StockAdjustment>,
) -> AppResult<Json<ProductResponse>> {
    ensure_admin(&current)?;
    let product = state.products().adjust_stock(id, payload.quantity).await?;
    tracing::info!(
        product_id = id,
        delta = payload.quantity,
        stock = product.stock,
        "Stock adjusted"
    );
    Ok(Json(product.into()))
}

/// POST /api/products/{id}/feature - toggle the featured flag (admin)
pub async fn toggle_featured(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ProductResponse>> {
    ensure_admin(&current)?;
    let product = state.products().toggle_featured(id).await?;
    Ok(Json(product.into()))
}
