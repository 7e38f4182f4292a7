//! User repository

use sqlx::SqlitePool;

use super::{clamp_page, map_db_err};
use crate::db::models::{User, UserUpdate};
use crate::utils::{AppError, AppResult};

#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        is_admin: bool,
    ) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (username, email, password_hash, is_admin) \
             VALUES (?1, ?2, ?3, ?4) \
             RETURNING id, username, email, password_hash, is_admin, created_at",
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(is_admin)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_err)
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, is_admin, created_at \
             FROM users WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, is_admin, created_at \
             FROM users WHERE email = ?1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)
    }

    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, is_admin, created_at \
             FROM users WHERE username = ?1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)
    }

    pub async fn list(&self, skip: i64, limit: Option<i64>) -> AppResult<Vec<User>> {
        let (skip, limit) = clamp_page(skip, limit);
        sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, is_admin, created_at \
             FROM users ORDER BY id LIMIT ?1 OFFSET ?2",
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err)
    }

    /// Merge-update: only fields present in the payload change.
    /// The password, when present, must already be hashed by the caller.
    pub async fn update(
        &self,
        id: i64,
        update: &UserUpdate,
        password_hash: Option<String>,
    ) -> AppResult<User> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))?;

        let username = update.username.clone().unwrap_or(current.username);
        let email = update.email.clone().unwrap_or(current.email);
        let hash = password_hash.unwrap_or(current.password_hash);

        sqlx::query_as::<_, User>(
            "UPDATE users SET username = ?1, email = ?2, password_hash = ?3 \
             WHERE id = ?4 \
             RETURNING id, username, email, password_hash, is_admin, created_at",
        )
        .bind(username)
        .bind(email)
        .bind(hash)
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_err)
    }

    pub async fn set_admin(&self, id: i64, is_admin: bool) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET is_admin = ?1 WHERE id = ?2 \
             RETURNING id, username, email, password_hash, is_admin, created_at",
        )
        .bind(is_admin)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)?
        .ok_or_else(|| AppError::not_found(format!("User {id} not found")))
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_err)?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("User {id} not found")));
        }
        Ok(())
    }
}
