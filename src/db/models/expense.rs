//! Expense model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Expense model
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Expense {
    pub id: i64,
    pub description: String,
    pub amount: f64,
    pub category: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Create expense payload
#[derive(Debug, Clone, Deserialize)]
pub struct ExpenseCreate {
    pub description: String,
    pub amount: f64,
    pub category: Option<String>,
}

/// Update payload — absent fields are left untouched
#[derive(Debug, Clone, Deserialize)]
pub struct ExpenseUpdate {
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub category: Option<String>,
}
