//! Sale model
//!
//! The sales endpoints keep the wire format the legacy storefront client
//! already speaks (Spanish field names), so the request/response DTOs carry
//! serde renames. Internal names stay English.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Sale row as stored
#[derive(Debug, Clone, FromRow)]
pub struct Sale {
    pub id: i64,
    pub user_id: Option<i64>,
    pub total: f64,
    pub created_at: NaiveDateTime,
}

/// Sale line item joined with the product name
#[derive(Debug, Clone, FromRow)]
pub struct SaleDetail {
    pub id: i64,
    pub sale_id: i64,
    pub product_id: Option<i64>,
    pub product_name: Option<String>,
    pub quantity: i64,
    pub unit_price: f64,
    pub subtotal: f64,
    pub color: Option<String>,
    pub size: Option<String>,
}

/// One requested line item when placing a sale
#[derive(Debug, Clone, Deserialize)]
pub struct SaleItemInput {
    #[serde(rename = "producto_id")]
    pub product_id: i64,
    #[serde(rename = "cantidad")]
    pub quantity: i64,
    #[serde(rename = "color_seleccionado")]
    pub color: Option<String>,
    #[serde(rename = "talla_seleccionada")]
    pub size: Option<String>,
}

/// Place-sale payload
#[derive(Debug, Clone, Deserialize)]
pub struct SaleCreate {
    #[serde(rename = "detalles")]
    pub details: Vec<SaleItemInput>,
}

/// Sale line item as exposed over the API
#[derive(Debug, Clone, Serialize)]
pub struct SaleDetailResponse {
    pub id: i64,
    #[serde(rename = "producto_id")]
    pub product_id: Option<i64>,
    #[serde(rename = "producto_nombre")]
    pub product_name: Option<String>,
    #[serde(rename = "cantidad")]
    pub quantity: i64,
    #[serde(rename = "precio_unitario")]
    pub unit_price: f64,
    pub subtotal: f64,
    #[serde(rename = "color_seleccionado")]
    pub color: Option<String>,
    #[serde(rename = "talla_seleccionada")]
    pub size: Option<String>,
}

impl From<SaleDetail> for SaleDetailResponse {
    fn from(detail: SaleDetail) -> Self {
        Self {
            id: detail.id,
            product_id: detail.product_id,
            product_name: detail.product_name,
            quantity: detail.quantity,
            unit_price: detail.unit_price,
            subtotal: detail.subtotal,
            color: detail.color,
            size: detail.size,
        }
    }
}

/// Sale as exposed over the API
#[derive(Debug, Clone, Serialize)]
pub struct SaleResponse {
    pub id: i64,
    #[serde(rename = "usuario_id")]
    pub user_id: Option<i64>,
    pub total: f64,
    #[serde(rename = "fecha")]
    pub created_at: NaiveDateTime,
    #[serde(rename = "detalles")]
    pub details: Vec<SaleDetailResponse>,
}

impl SaleResponse {
    pub fn from_parts(sale: Sale, details: Vec<SaleDetail>) -> Self {
        Self {
            id: sale.id,
            user_id: sale.user_id,
            total: sale.total,
            created_at: sale.created_at,
            details: details.into_iter().map(Into::into).collect(),
        }
    }
}

/// Date-range + user filters for the admin sale listing.
///
/// Both bounds are calendar dates and `fecha_hasta` is inclusive,
/// matching what the storefront already sends.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaleFilter {
    #[serde(rename = "fecha_desde")]
    pub date_from: Option<NaiveDate>,
    #[serde(rename = "fecha_hasta")]
    pub date_to: Option<NaiveDate>,
    #[serde(rename = "usuario_id")]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub skip: i64,
    pub limit: Option<i64>,
}
