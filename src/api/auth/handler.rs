//! Authentication handlers

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{User, UserCreate, UserResponse};
use crate::utils::{AppError, AppResult, validation};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    #[serde(rename = "usuario")]
    pub user: UserResponse,
}

fn token_response(state: &ServerState, user: &User) -> AppResult<TokenResponse> {
    Ok(TokenResponse {
        access_token: state.jwt_service.generate_access_token(user)?,
        refresh_token: state.jwt_service.generate_refresh_token(user)?,
        token_type: "bearer",
        user: user.clone().into(),
    })
}

/// POST /api/auth/register - create an account and log it in
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<UserCreate>,
) -> AppResult<(StatusCode, Json<TokenResponse>)> {
    validation::validate_required_text(&payload.username, "username", validation::MAX_NAME_LEN)?;
    validation::validate_email(&payload.email)?;
    validation::validate_password(&payload.password)?;

    let users = state.users();
    if users.find_by_email(&payload.email).await?.is_some() {
        return Err(AppError::conflict("Email already registered"));
    }
    if users.find_by_username(&payload.username).await?.is_some() {
        return Err(AppError::conflict("Username already taken"));
    }

    let hash = User::hash_password(&payload.password)
        .map_err(|e| AppError::internal(format!("Password hashing: {e}")))?;
    let user = users
        .create(&payload.username, &payload.email, &hash, false)
        .await?;
    tracing::info!(user_id = user.id, "User registered");

    Ok((StatusCode::CREATED, Json(token_response(&state, &user)?)))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let user = state
        .users()
        .find_by_email(&payload.email)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    let valid = user
        .verify_password(&payload.password)
        .map_err(|e| AppError::internal(format!("Password verification: {e}")))?;
    if !valid {
        return Err(AppError::invalid_credentials());
    }

    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(token_response(&state, &user)?))
}

/// POST /api/auth/refresh - exchange a refresh token for fresh tokens
pub async fn refresh(
    State(state): State<ServerState>,
    Json(payload): Json<RefreshRequest>,
) -> AppResult<Json<TokenResponse>> {
    let claims = state
        .jwt_service
        .verify_token(&payload.refresh_token, "refresh")?;

    // re-read the user so revoked accounts and role changes take effect
    let user = state
        .users()
        .find_by_id(claims.user_id()?)
        .await?
        .ok_or_else(|| AppError::invalid_token("Account no longer exists"))?;

    Ok(Json(token_response(&state, &user)?))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<ServerState>,
    current: CurrentUser,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .users()
        .find_by_id(current.id)
        .await?
        .ok_or_else(|| AppError::not_found("Account no longer exists"))?;
    Ok(Json(user.into()))
}
