//! Money calculation utilities using rust_decimal for precision
//!
//! All monetary arithmetic is done in `Decimal` and only converted back to
//! `f64` for storage and serialization, rounded to 2 decimal places
//! (half away from zero).

use rust_decimal::prelude::*;

use crate::utils::AppError;

/// Rounding for monetary values (2 decimal places)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed price per unit
pub const MAX_PRICE: f64 = 1_000_000.0;

/// Maximum allowed quantity per line item
pub const MAX_QUANTITY: i64 = 9999;

/// Validate a unit price coming from a request (finite, positive, bounded).
pub fn validate_price(price: f64) -> Result<(), AppError> {
    if !price.is_finite() {
        return Err(AppError::validation(format!(
            "price must be a finite number, got {price}"
        )));
    }
    if price <= 0.0 {
        return Err(AppError::validation(format!(
            "price must be positive, got {price}"
        )));
    }
    if price > MAX_PRICE {
        return Err(AppError::validation(format!(
            "price exceeds maximum allowed ({MAX_PRICE}), got {price}"
        )));
    }
    Ok(())
}

/// Validate a positive monetary amount (expenses).
pub fn validate_amount(amount: f64) -> Result<(), AppError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(AppError::validation(format!(
            "amount must be a positive number, got {amount}"
        )));
    }
    if amount > MAX_PRICE {
        return Err(AppError::validation(format!(
            "amount exceeds maximum allowed ({MAX_PRICE}), got {amount}"
        )));
    }
    Ok(())
}

/// Validate a line-item quantity.
pub fn validate_quantity(quantity: i64) -> Result<(), AppError> {
    if quantity <= 0 {
        return Err(AppError::validation(format!(
            "quantity must be positive, got {quantity}"
        )));
    }
    if quantity > MAX_QUANTITY {
        return Err(AppError::validation(format!(
            "quantity exceeds maximum allowed ({MAX_QUANTITY}), got {quantity}"
        )));
    }
    Ok(())
}

fn to_decimal(value: f64, field: &str) -> Result<Decimal, AppError> {
    Decimal::from_f64(value)
        .ok_or_else(|| AppError::internal(format!("{field} is not representable: {value}")))
}

fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

/// Round a monetary value to 2 decimal places.
pub fn round2(value: f64) -> f64 {
    Decimal::from_f64(value).map(to_f64).unwrap_or(0.0)
}

/// Line subtotal = unit price × quantity, computed in Decimal.
pub fn line_subtotal(unit_price: f64, quantity: i64) -> Result<f64, AppError> {
    let price = to_decimal(unit_price, "unit_price")?;
    Ok(to_f64(price * Decimal::from(quantity)))
}

/// Sum monetary values in Decimal to avoid f64 drift across many items.
pub fn sum2<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    let total = values
        .into_iter()
        .filter_map(Decimal::from_f64)
        .fold(Decimal::ZERO, |acc, v| acc + v);
    to_f64(total)
}
