//! Reporting handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::ProductResponse;
use crate::db::repository::report::{
    CategoryPerformance, DateRange, FinancialSummary, MonthlySales, TopCustomer, TopProduct,
};
use crate::utils::AppResult;

#[derive(Debug, Default, Deserialize)]
pub struct TopParams {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct LowStockParams {
    pub threshold: Option<i64>,
}

/// GET /api/reports/financial - sales vs expenses over a window
pub async fn financial(
    State(state): State<ServerState>,
    Query(range): Query<DateRange>,
) -> AppResult<Json<FinancialSummary>> {
    Ok(Json(state.reports().financial_summary(&range).await?))
}

/// GET /api/reports/sales-by-month
pub async fn sales_by_month(
    State(state): State<ServerState>,
    Query(range): Query<DateRange>,
) -> AppResult<Json<Vec<MonthlySales>>> {
    Ok(Json(state.reports().sales_by_month(&range).await?))
}

/// GET /api/reports/top-products
pub async fn top_products(
    State(state): State<ServerState>,
    Query(params): Query<TopParams>,
) -> AppResult<Json<Vec<TopProduct>>> {
    Ok(Json(
        state.reports().top_products(params.limit.unwrap_or(10)).await?,
    ))
}

/// GET /api/reports/categories - revenue per category
pub async fn category_performance(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<CategoryPerformance>>> {
    Ok(Json(state.reports().category_performance().await?))
}

/// GET /api/reports/top-customers
pub async fn top_customers(
    State(state): State<ServerState>,
    Query(params): Query<TopParams>,
) -> AppResult<Json<Vec<TopCustomer>>> {
    Ok(Json(
        state
            .reports()
            .top_customers(params.limit.unwrap_or(10))
            .await?,
    ))
}

/// GET /api/reports/low-stock - products at or below the threshold
pub async fn low_stock(
    State(state): State<ServerState>,
    Query(params): Query<LowStockParams>,
) -> AppResult<Json<Vec<ProductResponse>>> {
    let products = state
        .products()
        .list_low_stock(params.threshold.unwrap_or(5))
        .await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}
