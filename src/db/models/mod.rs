//! Database models

pub mod category;
pub mod expense;
pub mod product;
pub mod sale;
pub mod user;

pub use category::{Category, CategoryCreate, CategoryUpdate};
pub use expense::{Expense, ExpenseCreate, ExpenseUpdate};
pub use product::{Product, ProductCreate, ProductFilter, ProductResponse, ProductUpdate};
pub use sale::{
    Sale, SaleCreate, SaleDetail, SaleDetailResponse, SaleFilter, SaleItemInput, SaleResponse,
};
pub use user::{User, UserCreate, UserResponse, UserUpdate};
