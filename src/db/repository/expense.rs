//! Expense repository

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::{clamp_page, map_db_err};
use crate::db::models::{Expense, ExpenseCreate, ExpenseUpdate};
use crate::utils::{AppError, AppResult};

/// Date-range + category filters for the expense listing
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ExpenseFilter {
    pub date_from: Option<chrono::NaiveDateTime>,
    pub date_to: Option<chrono::NaiveDateTime>,
    pub category: Option<String>,
    #[serde(default)]
    pub skip: i64,
    pub limit: Option<i64>,
}

#[derive(Clone)]
pub struct ExpenseRepository {
    pool: SqlitePool,
}

impl ExpenseRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, filter: &ExpenseFilter) -> AppResult<Vec<Expense>> {
        let (skip, limit) = clamp_page(filter.skip, filter.limit);

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT id, description, amount, category, created_at FROM expenses WHERE 1 = 1",
        );
        if let Some(from) = filter.date_from {
            qb.push(" AND created_at >= ").push_bind(from);
        }
        if let Some(to) = filter.date_to {
            qb.push(" AND created_at <= ").push_bind(to);
        }
        if let Some(category) = filter.category.as_deref()
            && !category.is_empty()
        {
            qb.push(" AND category = ").push_bind(category.to_string());
        }
        qb.push(" ORDER BY id DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(skip);

        qb.build_query_as::<Expense>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_err)
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Expense>> {
        sqlx::query_as::<_, Expense>(
            "SELECT id, description, amount, category, created_at FROM expenses WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)
    }

    pub async fn create(&self, create: &ExpenseCreate) -> AppResult<Expense> {
        sqlx::query_as::<_, Expense>(
            "INSERT INTO expenses (description, amount, category) VALUES (?1, ?2, ?3) \
             RETURNING id, description, amount, category, created_at",
        )
        .bind(&create.description)
        .bind(create.amount)
        .bind(&create.category)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_err)
    }

    /// Merge-update: only fields present in the payload change.
    pub async fn update(&self, id: i64, update: &ExpenseUpdate) -> AppResult<Expense> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Expense {id} not found")))?;

        let description = update.description.clone().unwrap_or(current.description);
        let amount = update.amount.unwrap_or(current.amount);
        let category = update.category.clone().or(current.category);

        sqlx::query_as::<_, Expense>(
            "UPDATE expenses SET description = ?1, amount = ?2, category = ?3 WHERE id = ?4 \
             RETURNING id, description, amount, category, created_at",
        )
        .bind(&description)
        .bind(amount)
        .bind(&category)
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_err)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_err)?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Expense {id} not found")));
        }
        Ok(())
    }

    /// Distinct non-empty category names in use.
    pub async fn list_categories(&self) -> AppResult<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT category FROM expenses \
             WHERE category IS NOT NULL AND category != '' ORDER BY category",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err)
    }
}
