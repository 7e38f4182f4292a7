//! Product repository

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::{clamp_page, map_db_err};
use crate::db::models::{Product, ProductCreate, ProductFilter, ProductUpdate};
use crate::utils::{AppError, AppResult};

const PRODUCT_COLUMNS: &str =
    "id, name, description, price, stock, image, colors, sizes, featured, category_id, created_at";

#[derive(Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Listing with optional featured / category / text-search filters.
    pub async fn list(&self, filter: &ProductFilter) -> AppResult<Vec<Product>> {
        let (skip, limit) = clamp_page(filter.skip, filter.limit);

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE 1 = 1"
        ));
        if let Some(featured) = filter.featured {
            qb.push(" AND featured = ").push_bind(featured);
        }
        if let Some(category_id) = filter.category_id {
            qb.push(" AND category_id = ").push_bind(category_id);
        }
        if let Some(search) = filter.search.as_deref()
            && !search.trim().is_empty()
        {
            let pattern = format!("%{}%", search.trim());
            qb.push(" AND (name LIKE ")
                .push_bind(pattern.clone())
                .push(" OR description LIKE ")
                .push_bind(pattern)
                .push(")");
        }
        qb.push(" ORDER BY id LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(skip);

        qb.build_query_as::<Product>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_err)
    }

    pub async fn list_featured(&self, limit: Option<i64>) -> AppResult<Vec<Product>> {
        let (_, limit) = clamp_page(0, limit.or(Some(8)));
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE featured = 1 \
             ORDER BY id DESC LIMIT ?1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err)
    }

    /// Most recently added products.
    pub async fn list_recent(&self, limit: Option<i64>) -> AppResult<Vec<Product>> {
        let (_, limit) = clamp_page(0, limit.or(Some(8)));
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id DESC LIMIT ?1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err)
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Product>> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)
    }

    pub async fn create(&self, create: &ProductCreate) -> AppResult<Product> {
        sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO products \
             (name, description, price, stock, image, colors, sizes, featured, category_id) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9) \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&create.name)
        .bind(&create.description)
        .bind(create.price)
        .bind(create.stock)
        .bind(&create.image)
        .bind(&create.colors)
        .bind(&create.sizes)
        .bind(create.featured)
        .bind(create.category_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_err)
    }

    /// Merge-update: only fields present in the payload change.
    pub async fn update(&self, id: i64, update: &ProductUpdate) -> AppResult<Product> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Product {id} not found")))?;

        let name = update.name.clone().unwrap_or(current.name);
        let description = update.description.clone().or(current.description);
        let price = update.price.unwrap_or(current.price);
        let stock = update.stock.unwrap_or(current.stock);
        let image = update.image.clone().or(current.image);
        let colors = update.colors.clone().or(current.colors);
        let sizes = update.sizes.clone().or(current.sizes);
        let featured = update.featured.unwrap_or(current.featured);
        let category_id = update.category_id.or(current.category_id);

        sqlx::query_as::<_, Product>(&format!(
            "UPDATE products SET name = ?1, description = ?2, price = ?3, stock = ?4, \
             image = ?5, colors = ?6, sizes = ?7, featured = ?8, category_id = ?9 \
             WHERE id = ?10 \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&name)
        .bind(&description)
        .bind(price)
        .bind(stock)
        .bind(&image)
        .bind(&colors)
        .bind(&sizes)
        .bind(featured)
        .bind(category_id)
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_err)
    }

    /// Relative stock adjustment, clamped at zero. The clamp happens in SQL
    /// so concurrent adjustments cannot drive stock negative.
    pub async fn adjust_stock(&self, id: i64, delta: i64) -> AppResult<Product> {
        sqlx::query_as::<_, Product>(&format!(
            "UPDATE products SET stock = MAX(0, stock + ?1) WHERE id = ?2 \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(delta)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)?
        .ok_or_else(|| AppError::not_found(format!("Product {id} not found")))
    }

    pub async fn toggle_featured(&self, id: i64) -> AppResult<Product> {
        sqlx::query_as::<_, Product>(&format!(
            "UPDATE products SET featured = NOT featured WHERE id = ?1 \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)?
        .ok_or_else(|| AppError::not_found(format!("Product {id} not found")))
    }

    /// Sale history keeps its rows; line items referencing the product get
    /// a NULL foreign key via the schema.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_err)?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Product {id} not found")));
        }
        Ok(())
    }

    pub async fn list_low_stock(&self, threshold: i64) -> AppResult<Vec<Product>> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE stock <= ?1 ORDER BY stock ASC"
        ))
        .bind(threshold)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err)
    }
}
