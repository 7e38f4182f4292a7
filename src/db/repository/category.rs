//! Category repository

use sqlx::SqlitePool;

use super::map_db_err;
use crate::db::models::{Category, CategoryCreate, CategoryUpdate};
use crate::utils::{AppError, AppResult};

#[derive(Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<Category>> {
        sqlx::query_as::<_, Category>("SELECT id, name, description FROM categories ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_err)
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Category>> {
        sqlx::query_as::<_, Category>(
            "SELECT id, name, description FROM categories WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)
    }

    pub async fn create(&self, create: &CategoryCreate) -> AppResult<Category> {
        sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name, description) VALUES (?1, ?2) \
             RETURNING id, name, description",
        )
        .bind(&create.name)
        .bind(&create.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::conflict(format!("Category '{}' already exists", create.name))
            }
            _ => map_db_err(e),
        })
    }

    /// Merge-update: only fields present in the payload change.
    pub async fn update(&self, id: i64, update: &CategoryUpdate) -> AppResult<Category> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Category {id} not found")))?;

        let name = update.name.clone().unwrap_or(current.name);
        let description = update.description.clone().or(current.description);

        sqlx::query_as::<_, Category>(
            "UPDATE categories SET name = ?1, description = ?2 WHERE id = ?3 \
             RETURNING id, name, description",
        )
        .bind(&name)
        .bind(&description)
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::conflict(format!("Category '{name}' already exists"))
            }
            _ => map_db_err(e),
        })
    }

    /// Products referencing the category keep their rows; the foreign key
    /// is set to NULL by the schema.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_err)?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Category {id} not found")));
        }
        Ok(())
    }
}
