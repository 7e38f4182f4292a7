//! Utility module - shared helpers and types
//!
//! - [`AppError`] / [`AppResult`] - application error handling
//! - [`logger`] - tracing setup
//! - [`money`] - decimal-precise monetary helpers
//! - [`validation`] - input length/shape checks

pub mod error;
pub mod logger;
pub mod money;
pub mod validation;

pub use error::{AppError, AppResult, ErrorBody, MessageResponse};
pub use logger::init_logger;
