//! Repository layer
//!
//! Each repository owns a handle to the pool and exposes the storage
//! operations for one aggregate. Handlers never touch SQL directly.

pub mod category;
pub mod expense;
pub mod product;
pub mod report;
pub mod sale;
pub mod user;

pub use category::CategoryRepository;
pub use expense::ExpenseRepository;
pub use product::ProductRepository;
pub use report::ReportRepository;
pub use sale::SaleRepository;
pub use user::UserRepository;

use crate::utils::AppError;

/// Default page size when the caller does not pass `limit`
pub const DEFAULT_PAGE_SIZE: i64 = 100;

/// Hard ceiling on page size
pub const MAX_PAGE_SIZE: i64 = 500;

/// Clamp caller-supplied paging values to sane bounds.
pub(crate) fn clamp_page(skip: i64, limit: Option<i64>) -> (i64, i64) {
    let skip = skip.max(0);
    let limit = limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    (skip, limit)
}

/// Map a sqlx error, surfacing unique-constraint hits as conflicts.
pub(crate) fn map_db_err(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::conflict("Resource already exists")
        }
        _ => AppError::database(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_page_bounds() {
        assert_eq!(clamp_page(0, None), (0, DEFAULT_PAGE_SIZE));
        assert_eq!(clamp_page(-5, Some(0)), (0, 1));
        assert_eq!(clamp_page(10, Some(9999)), (10, MAX_PAGE_SIZE));
    }
}
