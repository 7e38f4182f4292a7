//! Sale repository
//!
//! Placing a sale is the one multi-statement write in the system. It runs
//! inside a single `BEGIN IMMEDIATE` transaction so the write lock is taken
//! up front and two concurrent placements serialize instead of failing on a
//! snapshot upgrade. The stock decrement itself is conditional
//! (`AND stock >= quantity`), so stock can never go negative even under
//! concurrent load: the losing transaction sees zero rows affected and the
//! whole sale rolls back.

use chrono::{Days, NaiveTime};
use serde::Serialize;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use super::report::DateRange;
use super::{clamp_page, map_db_err};
use crate::db::models::{Sale, SaleDetail, SaleFilter, SaleItemInput, SaleResponse};
use crate::utils::{AppError, AppResult, money};

const DETAIL_QUERY: &str = "SELECT d.id, d.sale_id, d.product_id, p.name AS product_name, \
     d.quantity, d.unit_price, d.subtotal, d.color, d.size \
     FROM sale_details d LEFT JOIN products p ON p.id = d.product_id \
     WHERE d.sale_id = ?1 ORDER BY d.id";

/// Product snapshot taken inside the placement transaction
#[derive(sqlx::FromRow)]
struct ProductLine {
    id: i64,
    name: String,
    price: f64,
    stock: i64,
}

/// Sales totals over an optional window
#[derive(Debug, Clone, Serialize)]
pub struct SaleSummary {
    pub count: i64,
    pub revenue: f64,
    pub average: f64,
}

#[derive(Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Place a sale: decrement stock for every line item and record the
    /// sale with its details, all-or-nothing.
    ///
    /// Prices are snapshotted from the product at placement time; later
    /// price changes do not affect recorded sales.
    pub async fn place_sale(
        &self,
        user_id: i64,
        items: &[SaleItemInput],
    ) -> AppResult<SaleResponse> {
        if items.is_empty() {
            return Err(AppError::validation("Sale must contain at least one item"));
        }
        for item in items {
            money::validate_quantity(item.quantity)?;
        }

        let mut conn = self.pool.acquire().await.map_err(map_db_err)?;
        sqlx::query("BEGIN IMMEDIATE")
            .execute(&mut *conn)
            .await
            .map_err(map_db_err)?;

        let sale_id = match place_sale_tx(&mut conn, user_id, items).await {
            Ok(sale_id) => {
                sqlx::query("COMMIT")
                    .execute(&mut *conn)
                    .await
                    .map_err(map_db_err)?;
                sale_id
            }
            Err(err) => {
                // rollback failure is secondary to the original error
                let _ = sqlx::query("ROLLBACK").execute(&mut *conn).await;
                return Err(err);
            }
        };
        drop(conn);

        self.find_by_id(sale_id)
            .await?
            .ok_or_else(|| AppError::internal(format!("Sale {sale_id} missing after commit")))
    }

    /// Cancel a sale: restore stock for every line item whose product still
    /// exists, then delete the sale (details cascade).
    pub async fn cancel_sale(&self, sale_id: i64) -> AppResult<()> {
        let mut conn = self.pool.acquire().await.map_err(map_db_err)?;
        sqlx::query("BEGIN IMMEDIATE")
            .execute(&mut *conn)
            .await
            .map_err(map_db_err)?;

        match cancel_sale_tx(&mut conn, sale_id).await {
            Ok(()) => sqlx::query("COMMIT")
                .execute(&mut *conn)
                .await
                .map(|_| ())
                .map_err(map_db_err),
            Err(err) => {
                let _ = sqlx::query("ROLLBACK").execute(&mut *conn).await;
                Err(err)
            }
        }
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<SaleResponse>> {
        let Some(sale) = sqlx::query_as::<_, Sale>(
            "SELECT id, user_id, total, created_at FROM sales WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)?
        else {
            return Ok(None);
        };

        let details = sqlx::query_as::<_, SaleDetail>(DETAIL_QUERY)
            .bind(id)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_err)?;

        Ok(Some(SaleResponse::from_parts(sale, details)))
    }

    /// Admin listing with optional date-range and user filters,
    /// newest first.
    pub async fn list(&self, filter: &SaleFilter) -> AppResult<Vec<SaleResponse>> {
        let (skip, limit) = clamp_page(filter.skip, filter.limit);

        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT id, user_id, total, created_at FROM sales WHERE 1 = 1");
        if let Some(from) = filter.date_from {
            qb.push(" AND created_at >= ")
                .push_bind(from.and_time(NaiveTime::MIN));
        }
        // fecha_hasta is an inclusive date: compare strictly below the next day
        if let Some(to) = filter.date_to
            && let Some(end) = to.checked_add_days(Days::new(1))
        {
            qb.push(" AND created_at < ")
                .push_bind(end.and_time(NaiveTime::MIN));
        }
        if let Some(user_id) = filter.user_id {
            qb.push(" AND user_id = ").push_bind(user_id);
        }
        qb.push(" ORDER BY id DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(skip);

        let sales = qb
            .build_query_as::<Sale>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_err)?;

        self.attach_details(sales).await
    }

    /// Sales that belong to one user, newest first.
    pub async fn list_by_user(
        &self,
        user_id: i64,
        skip: i64,
        limit: Option<i64>,
    ) -> AppResult<Vec<SaleResponse>> {
        let (skip, limit) = clamp_page(skip, limit);
        let sales = sqlx::query_as::<_, Sale>(
            "SELECT id, user_id, total, created_at FROM sales \
             WHERE user_id = ?1 ORDER BY id DESC LIMIT ?2 OFFSET ?3",
        )
        .bind(user_id)
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err)?;

        self.attach_details(sales).await
    }

    /// Count / revenue / average ticket, optionally windowed.
    pub async fn summary(&self, range: &DateRange) -> AppResult<SaleSummary> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT COUNT(*) AS count, COALESCE(ROUND(SUM(total), 2), 0.0) AS revenue \
             FROM sales WHERE 1 = 1",
        );
        if let Some(from) = range.date_from {
            qb.push(" AND created_at >= ").push_bind(from);
        }
        if let Some(to) = range.date_to {
            qb.push(" AND created_at <= ").push_bind(to);
        }

        let (count, revenue) = qb
            .build_query_as::<(i64, f64)>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_err)?;
        let average = if count > 0 {
            money::round2(revenue / count as f64)
        } else {
            0.0
        };
        Ok(SaleSummary {
            count,
            revenue,
            average,
        })
    }

    async fn attach_details(&self, sales: Vec<Sale>) -> AppResult<Vec<SaleResponse>> {
        let mut responses = Vec::with_capacity(sales.len());
        for sale in sales {
            let details = sqlx::query_as::<_, SaleDetail>(DETAIL_QUERY)
                .bind(sale.id)
                .fetch_all(&self.pool)
                .await
                .map_err(map_db_err)?;
            responses.push(SaleResponse::from_parts(sale, details));
        }
        Ok(responses)
    }
}

async fn place_sale_tx(
    conn: &mut SqliteConnection,
    user_id: i64,
    items: &[SaleItemInput],
) -> AppResult<i64> {
    let mut lines: Vec<(&SaleItemInput, ProductLine, f64)> = Vec::with_capacity(items.len());

    for item in items {
        let product = sqlx::query_as::<_, ProductLine>(
            "SELECT id, name, price, stock FROM products WHERE id = ?1",
        )
        .bind(item.product_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(map_db_err)?
        .ok_or_else(|| AppError::not_found(format!("Product {} not found", item.product_id)))?;

        let updated =
            sqlx::query("UPDATE products SET stock = stock - ?1 WHERE id = ?2 AND stock >= ?1")
                .bind(item.quantity)
                .bind(item.product_id)
                .execute(&mut *conn)
                .await
                .map_err(map_db_err)?;
        if updated.rows_affected() == 0 {
            return Err(AppError::InsufficientStock {
                product_id: product.id,
                name: product.name,
                available: product.stock,
                requested: item.quantity,
            });
        }

        let subtotal = money::line_subtotal(product.price, item.quantity)?;
        lines.push((item, product, subtotal));
    }

    let total = money::sum2(lines.iter().map(|(_, _, subtotal)| *subtotal));

    let sale_id: i64 =
        sqlx::query_scalar("INSERT INTO sales (user_id, total) VALUES (?1, ?2) RETURNING id")
            .bind(user_id)
            .bind(total)
            .fetch_one(&mut *conn)
            .await
            .map_err(map_db_err)?;

    for (item, product, subtotal) in &lines {
        sqlx::query(
            "INSERT INTO sale_details \
             (sale_id, product_id, quantity, unit_price, subtotal, color, size) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(sale_id)
        .bind(product.id)
        .bind(item.quantity)
        .bind(money::round2(product.price))
        .bind(subtotal)
        .bind(&item.color)
        .bind(&item.size)
        .execute(&mut *conn)
        .await
        .map_err(map_db_err)?;
    }

    Ok(sale_id)
}

async fn cancel_sale_tx(conn: &mut SqliteConnection, sale_id: i64) -> AppResult<()> {
    let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM sales WHERE id = ?1")
        .bind(sale_id)
        .fetch_one(&mut *conn)
        .await
        .map_err(map_db_err)?;
    if exists == 0 {
        return Err(AppError::not_found(format!("Sale {sale_id} not found")));
    }

    let details = sqlx::query_as::<_, (Option<i64>, i64)>(
        "SELECT product_id, quantity FROM sale_details WHERE sale_id = ?1",
    )
    .bind(sale_id)
    .fetch_all(&mut *conn)
    .await
    .map_err(map_db_err)?;

    for (product_id, quantity) in details {
        // product may have been deleted since the sale; skip restock then
        if let Some(product_id) = product_id {
            sqlx::query("UPDATE products SET stock = stock + ?1 WHERE id = ?2")
                .bind(quantity)
                .bind(product_id)
                .execute(&mut *conn)
                .await
                .map_err(map_db_err)?;
        }
    }

    sqlx::query("DELETE FROM sales WHERE id = ?1")
        .bind(sale_id)
        .execute(&mut *conn)
        .await
        .map_err(map_db_err)?;

    Ok(())
}
