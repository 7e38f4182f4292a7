//! Dashboard statistics handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::{SaleFilter, SaleResponse};
use crate::db::repository::report::{DailySales, DashboardStats};
use crate::utils::AppResult;

#[derive(Debug, Default, Deserialize)]
pub struct RecentParams {
    pub limit: Option<i64>,
}

const LOW_STOCK_ALERT: i64 = 5;

/// GET /api/stats/dashboard - lifetime and today's headline figures
pub async fn dashboard(State(state): State<ServerState>) -> AppResult<Json<DashboardStats>> {
    Ok(Json(state.reports().dashboard(LOW_STOCK_ALERT).await?))
}

/// GET /api/stats/sales-by-day - current month, one point per day
pub async fn sales_by_day(State(state): State<ServerState>) -> AppResult<Json<Vec<DailySales>>> {
    Ok(Json(state.reports().sales_by_day_current_month().await?))
}

/// GET /api/stats/recent-sales - latest sales, newest first
pub async fn recent_sales(
    State(state): State<ServerState>,
    Query(params): Query<RecentParams>,
) -> AppResult<Json<Vec<SaleResponse>>> {
    let filter = SaleFilter {
        limit: Some(params.limit.unwrap_or(10)),
        ..Default::default()
    };
    Ok(Json(state.sales().list(&filter).await?))
}
