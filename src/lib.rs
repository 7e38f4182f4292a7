//! Tienda Server - e-commerce admin and storefront backend
//!
//! # Module structure
//!
//! ```text
//! src/
//! ├── core/          # configuration, shared state, server lifecycle
//! ├── auth/          # JWT issuing/validation, middleware, extractors
//! ├── api/           # HTTP routes and handlers
//! ├── cart/          # per-user in-memory cart store
//! ├── db/            # SQLite pool, models, repositories
//! └── utils/         # errors, logging, money, validation
//! ```
//!
//! The engineering core is sale placement: an all-or-nothing SQLite
//! transaction that snapshots prices and conditionally decrements stock,
//! so inventory can never go negative even under concurrent checkouts.

pub mod api;
pub mod auth;
pub mod cart;
pub mod core;
pub mod db;
pub mod utils;

pub use auth::{CurrentUser, JwtService};
pub use cart::CartStore;
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};
pub use utils::logger::init_logger;

pub fn print_banner() {
    println!(
        r#"
 _______           __
|_     _|__.-----.|  |--.-----.
  |   | |  |  -__||    <|     |
  |___| |__|_____||__|__|__|__|
   __________
  /_  __/ __/__ _____  _____ _____
   / / _\ \/ -_) ___/ |/ / -_) __/
  /_/ /___/\__/_/  |___/\__/_/
    "#
    );
}
