//! User administration handlers
//!
//! Listing, editing other accounts and role changes are admin-only;
//! `PUT /me` and `GET /{id}` for one's own id are self-service.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::api::ensure_admin;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{User, UserResponse, UserUpdate};
use crate::utils::{AppError, AppResult, MessageResponse, validation};

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub skip: i64,
    pub limit: Option<i64>,
}

/// GET /api/users - list accounts (admin)
pub async fn list(
    State(state): State<ServerState>,
    current: CurrentUser,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<UserResponse>>> {
    ensure_admin(&current)?;
    let users = state.users().list(params.skip, params.limit).await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

/// GET /api/users/{id} - own account, or any account for admins
pub async fn get_by_id(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<UserResponse>> {
    if current.id != id {
        ensure_admin(&current)?;
    }
    let user = state
        .users()
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
    Ok(Json(user.into()))
}

/// PUT /api/users/me - update own account
pub async fn update_me(
    State(state): State<ServerState>,
    current: CurrentUser,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<UserResponse>> {
    apply_update(&state, current.id, payload).await
}

/// PUT /api/users/{id} - update any account (admin)
pub async fn update(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<UserResponse>> {
    if current.id != id {
        ensure_admin(&current)?;
    }
    apply_update(&state, id, payload).await
}

async fn apply_update(
    state: &ServerState,
    id: i64,
    payload: UserUpdate,
) -> AppResult<Json<UserResponse>> {
    if let Some(username) = &payload.username {
        validation::validate_required_text(username, "username", validation::MAX_NAME_LEN)?;
    }
    if let Some(email) = &payload.email {
        validation::validate_email(email)?;
    }

    let hash = match &payload.password {
        Some(password) => {
            validation::validate_password(password)?;
            Some(
                User::hash_password(password)
                    .map_err(|e| AppError::internal(format!("Password hashing: {e}")))?,
            )
        }
        None => None,
    };

    let user = state.users().update(id, &payload, hash).await?;
    Ok(Json(user.into()))
}

/// DELETE /api/users/{id} - remove an account (admin, not oneself)
pub async fn delete(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    ensure_admin(&current)?;
    if current.id == id {
        return Err(AppError::invalid("You cannot delete your own account"));
    }
    state.users().delete(id).await?;
    tracing::info!(user_id = id, by = current.id, "User deleted");
    Ok(Json(MessageResponse::new(format!("User {id} deleted"))))
}

/// POST /api/users/{id}/toggle-admin - flip the admin flag (admin, not oneself)
pub async fn toggle_admin(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<UserResponse>> {
    ensure_admin(&current)?;
    if current.id == id {
        return Err(AppError::invalid("You cannot change your own admin role"));
    }
    let users = state.users();
    let user = users
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;
    let updated = users.set_admin(id, !user.is_admin).await?;
    tracing::info!(
        user_id = id,
        is_admin = updated.is_admin,
        by = current.id,
        "Admin role toggled"
    );
    Ok(Json(updated.into()))
}
