//! Sales handlers
//!
//! Any authenticated user can place a sale and read their own history;
//! the global listing and cancellation are admin-only. Cancelling also
//! empties the buyer's line items back into stock.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::api::ensure_admin;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{SaleCreate, SaleFilter, SaleResponse};
use crate::db::repository::report::DateRange;
use crate::db::repository::sale::SaleSummary;
use crate::utils::{AppError, AppResult, MessageResponse};

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub skip: i64,
    pub limit: Option<i64>,
}

/// GET /api/sales - all sales with optional filters (admin)
pub async fn list(
    State(state): State<ServerState>,
    current: CurrentUser,
    Query(filter): Query<SaleFilter>,
) -> AppResult<Json<Vec<SaleResponse>>> {
    ensure_admin(&current)?;
    Ok(Json(state.sales().list(&filter).await?))
}

/// GET /api/sales/mine - own purchase history
pub async fn list_mine(
    State(state): State<ServerState>,
    current: CurrentUser,
    Query(params): Query<PageParams>,
) -> AppResult<Json<Vec<SaleResponse>>> {
    let sales = state
        .sales()
        .list_by_user(current.id, params.skip, params.limit)
        .await?;
    Ok(Json(sales))
}

/// GET /api/sales/summary - count / revenue / average ticket (admin)
pub async fn summary(
    State(state): State<ServerState>,
    current: CurrentUser,
    Query(range): Query<DateRange>,
) -> AppResult<Json<SaleSummary>> {
    ensure_admin(&current)?;
    Ok(Json(state.sales().summary(&range).await?))
}

/// GET /api/sales/{id} - owner or admin
pub async fn get_by_id(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<SaleResponse>> {
    let sale = state
        .sales()
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Sale {id} not found")))?;
    if sale.user_id != Some(current.id) {
        ensure_admin(&current)?;
    }
    Ok(Json(sale))
}

/// POST /api/sales - place a sale for the authenticated user
///
/// All-or-nothing: stock is decremented for every line item inside one
/// transaction, and the recorded prices are the products' current prices,
/// never client-supplied ones.
pub async fn create(
    State(state): State<ServerState>,
    current: CurrentUser,
    Json(payload): Json<SaleCreate>,
) -> AppResult<(StatusCode, Json<SaleResponse>)> {
    let sale = state
        .sales()
        .place_sale(current.id, &payload.details)
        .await?;
    // a completed purchase empties the cart
    state.cart.clear(current.id);
    tracing::info!(
        sale_id = sale.id,
        user_id = current.id,
        total = sale.total,
        items = sale.details.len(),
        "Sale placed"
    );
    Ok((StatusCode::CREATED, Json(sale)))
}

/// DELETE /api/sales/{id} - cancel a sale and restore stock (admin)
pub async fn cancel(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    ensure_admin(&current)?;
    state.sales().cancel_sale(id).await?;
    tracing::info!(sale_id = id, by = current.id, "Sale cancelled");
    Ok(Json(MessageResponse::new(format!(
        "Sale {id} cancelled and stock restored"
    ))))
}
