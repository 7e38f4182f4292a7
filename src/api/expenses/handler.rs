//! Expense handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Expense, ExpenseCreate, ExpenseUpdate};
use crate::db::repository::expense::ExpenseFilter;
use crate::utils::{AppError, AppResult, MessageResponse, money, validation};

/// GET /api/expenses - listing with date-range and category filters
pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<ExpenseFilter>,
) -> AppResult<Json<Vec<Expense>>> {
    Ok(Json(state.expenses().list(&filter).await?))
}

/// GET /api/expenses/categories - distinct category names in use
pub async fn list_categories(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<String>>> {
    Ok(Json(state.expenses().list_categories().await?))
}

/// GET /api/expenses/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Expense>> {
    let expense = state
        .expenses()
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Expense {id} not found")))?;
    Ok(Json(expense))
}

/// POST /api/expenses
pub async fn create(
    State(state): State<ServerState>,
    current: CurrentUser,
    Json(payload): Json<ExpenseCreate>,
) -> AppResult<(StatusCode, Json<Expense>)> {
    validation::validate_required_text(
        &payload.description,
        "description",
        validation::MAX_EXPENSE_DESCRIPTION_LEN,
    )?;
    validation::validate_optional_text(&payload.category, "category", validation::MAX_NAME_LEN)?;
    money::validate_amount(payload.amount)?;

    let expense = state.expenses().create(&payload).await?;
    tracing::info!(
        expense_id = expense.id,
        amount = expense.amount,
        by = current.id,
        "Expense recorded"
    );
    Ok((StatusCode::CREATED, Json(expense)))
}

/// PUT /api/expenses/{id} - merge-update
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ExpenseUpdate>,
) -> AppResult<Json<Expense>> {
    if let Some(description) = &payload.description {
        validation::validate_required_text(
            description,
            "description",
            validation::MAX_EXPENSE_DESCRIPTION_LEN,
        )?;
    }
    validation::validate_optional_text(&payload.category, "category", validation::MAX_NAME_LEN)?;
    if let Some(amount) = payload.amount {
        money::validate_amount(amount)?;
    }

    let expense = state.expenses().update(id, &payload).await?;
    Ok(Json(expense))
}

/// DELETE /api/expenses/{id}
pub async fn delete(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    state.expenses().delete(id).await?;
    tracing::info!(expense_id = id, by = current.id, "Expense deleted");
    Ok(Json(MessageResponse::new(format!("Expense {id} deleted"))))
}
