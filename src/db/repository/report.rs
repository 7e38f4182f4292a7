//! Reporting queries
//!
//! Read-only aggregates over sales, expenses and products. All sums come
//! back rounded to 2 decimal places.

use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};

use super::map_db_err;
use crate::utils::{AppResult, money};

/// Optional reporting window
#[derive(Debug, Clone, Copy, Default, serde::Deserialize)]
pub struct DateRange {
    pub date_from: Option<NaiveDateTime>,
    pub date_to: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FinancialSummary {
    pub total_sales: f64,
    pub total_expenses: f64,
    pub profit: f64,
    pub sales_count: i64,
    pub expenses_count: i64,
    pub average_ticket: f64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MonthlySales {
    pub month: String,
    pub total: f64,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DailySales {
    pub day: String,
    pub total: f64,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TopProduct {
    pub product_id: Option<i64>,
    pub name: Option<String>,
    pub units_sold: i64,
    pub revenue: f64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CategoryPerformance {
    pub category_id: Option<i64>,
    pub category: Option<String>,
    pub units_sold: i64,
    pub revenue: f64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TopCustomer {
    pub user_id: i64,
    pub username: String,
    pub orders: i64,
    pub spent: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub users: i64,
    pub products: i64,
    pub sales: i64,
    pub revenue: f64,
    pub expenses: f64,
    pub net: f64,
    pub today_sales: f64,
    pub today_expenses: f64,
    pub today_net: f64,
    pub low_stock: i64,
}

#[derive(Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn financial_summary(&self, range: &DateRange) -> AppResult<FinancialSummary> {
        let (total_sales, sales_count) =
            self.ranged_sum("sales", "total", range).await?;
        let (total_expenses, expenses_count) =
            self.ranged_sum("expenses", "amount", range).await?;

        let average_ticket = if sales_count > 0 {
            money::round2(total_sales / sales_count as f64)
        } else {
            0.0
        };
        Ok(FinancialSummary {
            total_sales,
            total_expenses,
            profit: money::round2(total_sales - total_expenses),
            sales_count,
            expenses_count,
            average_ticket,
        })
    }

    /// Sales totals grouped by calendar month.
    pub async fn sales_by_month(&self, range: &DateRange) -> AppResult<Vec<MonthlySales>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT strftime('%Y-%m', created_at) AS month, \
             ROUND(SUM(total), 2) AS total, COUNT(*) AS count \
             FROM sales WHERE 1 = 1",
        );
        push_range(&mut qb, range);
        qb.push(" GROUP BY month ORDER BY month");

        qb.build_query_as::<MonthlySales>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_err)
    }

    /// Best-selling products by units, with revenue.
    pub async fn top_products(&self, limit: i64) -> AppResult<Vec<TopProduct>> {
        sqlx::query_as::<_, TopProduct>(
            "SELECT d.product_id, p.name, \
             SUM(d.quantity) AS units_sold, ROUND(SUM(d.subtotal), 2) AS revenue \
             FROM sale_details d LEFT JOIN products p ON p.id = d.product_id \
             GROUP BY d.product_id, p.name \
             ORDER BY units_sold DESC LIMIT ?1",
        )
        .bind(limit.clamp(1, 100))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err)
    }

    /// Revenue and units grouped by product category.
    pub async fn category_performance(&self) -> AppResult<Vec<CategoryPerformance>> {
        sqlx::query_as::<_, CategoryPerformance>(
            "SELECT c.id AS category_id, c.name AS category, \
             SUM(d.quantity) AS units_sold, ROUND(SUM(d.subtotal), 2) AS revenue \
             FROM sale_details d \
             LEFT JOIN products p ON p.id = d.product_id \
             LEFT JOIN categories c ON c.id = p.category_id \
             GROUP BY c.id, c.name \
             ORDER BY revenue DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err)
    }

    /// Customers ranked by total spend.
    pub async fn top_customers(&self, limit: i64) -> AppResult<Vec<TopCustomer>> {
        sqlx::query_as::<_, TopCustomer>(
            "SELECT u.id AS user_id, u.username, \
             COUNT(s.id) AS orders, ROUND(SUM(s.total), 2) AS spent \
             FROM sales s JOIN users u ON u.id = s.user_id \
             GROUP BY u.id, u.username \
             ORDER BY spent DESC LIMIT ?1",
        )
        .bind(limit.clamp(1, 100))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err)
    }

    /// Per-day sales totals for the current calendar month.
    pub async fn sales_by_day_current_month(&self) -> AppResult<Vec<DailySales>> {
        sqlx::query_as::<_, DailySales>(
            "SELECT strftime('%Y-%m-%d', created_at) AS day, \
             ROUND(SUM(total), 2) AS total, COUNT(*) AS count \
             FROM sales \
             WHERE strftime('%Y-%m', created_at) = strftime('%Y-%m', 'now') \
             GROUP BY day ORDER BY day",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err)
    }

    pub async fn dashboard(&self, low_stock_threshold: i64) -> AppResult<DashboardStats> {
        let users = self.count("users").await?;
        let products = self.count("products").await?;
        let sales = self.count("sales").await?;
        let revenue = self.sum_where("sales", "total", "1 = 1").await?;
        let expenses = self.sum_where("expenses", "amount", "1 = 1").await?;
        let today_sales = self
            .sum_where("sales", "total", "date(created_at) = date('now')")
            .await?;
        let today_expenses = self
            .sum_where("expenses", "amount", "date(created_at) = date('now')")
            .await?;
        let low_stock: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE stock <= ?1")
                .bind(low_stock_threshold)
                .fetch_one(&self.pool)
                .await
                .map_err(map_db_err)?;

        Ok(DashboardStats {
            users,
            products,
            sales,
            revenue,
            expenses,
            net: money::round2(revenue - expenses),
            today_sales,
            today_expenses,
            today_net: money::round2(today_sales - today_expenses),
            low_stock,
        })
    }

    async fn sum_where(&self, table: &str, column: &str, clause: &str) -> AppResult<f64> {
        sqlx::query_scalar::<_, f64>(&format!(
            "SELECT COALESCE(ROUND(SUM({column}), 2), 0.0) FROM {table} WHERE {clause}"
        ))
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_err)
    }

    async fn count(&self, table: &str) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_err)
    }

    async fn ranged_sum(
        &self,
        table: &str,
        column: &str,
        range: &DateRange,
    ) -> AppResult<(f64, i64)> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT COALESCE(ROUND(SUM({column}), 2), 0.0) AS total, COUNT(*) AS count \
             FROM {table} WHERE 1 = 1"
        ));
        push_range(&mut qb, range);

        qb.build_query_as::<(f64, i64)>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_err)
    }
}

fn push_range(qb: &mut QueryBuilder<'_, Sqlite>, range: &DateRange) {
    if let Some(from) = range.date_from {
        qb.push(" AND created_at >= ").push_bind(from);
    }
    if let Some(to) = range.date_to {
        qb.push(" AND created_at <= ").push_bind(to);
    }
}
