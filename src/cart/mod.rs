//! In-memory shopping cart

pub mod store;

pub use store::{CartAction, CartItem, CartStore, ProductSnapshot, entry_key};
