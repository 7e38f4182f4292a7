//! Category handlers — reads public, writes admin-only

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::api::ensure_admin;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Category, CategoryCreate, CategoryUpdate};
use crate::utils::{AppError, AppResult, MessageResponse, validation};

/// GET /api/categories (public)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Category>>> {
    Ok(Json(state.categories().list().await?))
}

/// GET /api/categories/{id} (public)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Category>> {
    let category = state
        .categories()
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Category {id} not found")))?;
    Ok(Json(category))
}

/// POST /api/categories (admin)
pub async fn create(
    State(state): State<ServerState>,
    current: CurrentUser,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<(StatusCode, Json<Category>)> {
    ensure_admin(&current)?;
    validation::validate_required_text(&payload.name, "name", validation::MAX_NAME_LEN)?;
    validation::validate_optional_text(
        &payload.description,
        "description",
        validation::MAX_DESCRIPTION_LEN,
    )?;
    let category = state.categories().create(&payload).await?;
    tracing::info!(category_id = category.id, by = current.id, "Category created");
    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /api/categories/{id} - merge-update (admin)
pub async fn update(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<Category>> {
    ensure_admin(&current)?;
    if let Some(name) = &payload.name {
        validation::validate_required_text(name, "name", validation::MAX_NAME_LEN)?;
    }
    validation::validate_optional_text(
        &payload.description,
        "description",
        validation::MAX_DESCRIPTION_LEN,
    )?;
    let category = state.categories().update(id, &payload).await?;
    Ok(Json(category))
}

/// DELETE /api/categories/{id} (admin) - products keep their rows,
/// their category reference becomes NULL
pub async fn delete(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    ensure_admin(&current)?;
    state.categories().delete(id).await?;
    tracing::info!(category_id = id, by = current.id, "Category deleted");
    Ok(Json(MessageResponse::new(format!("Category {id} deleted"))))
}
