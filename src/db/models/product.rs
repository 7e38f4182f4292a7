//! Product model
//!
//! Variant attributes (colors, sizes) are stored as comma-delimited text
//! and parsed into sequences when building the API response.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::Category;

/// Product row as stored
#[derive(Debug, Clone, FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: i64,
    pub image: Option<String>,
    pub colors: Option<String>,
    pub sizes: Option<String>,
    pub featured: bool,
    pub category_id: Option<i64>,
    pub created_at: NaiveDateTime,
}

impl Product {
    pub fn parse_colors(&self) -> Vec<String> {
        parse_list(self.colors.as_deref())
    }

    pub fn parse_sizes(&self) -> Vec<String> {
        parse_list(self.sizes.as_deref())
    }
}

/// Split a comma-delimited variant list, trimming blanks.
fn parse_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Product as exposed over the API
#[derive(Debug, Clone, Serialize)]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: i64,
    pub image: Option<String>,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
    pub featured: bool,
    pub category_id: Option<i64>,
    pub created_at: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

impl ProductResponse {
    pub fn from_product(product: Product, category: Option<Category>) -> Self {
        let colors = product.parse_colors();
        let sizes = product.parse_sizes();
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            stock: product.stock,
            image: product.image,
            colors,
            sizes,
            featured: product.featured,
            category_id: product.category_id,
            created_at: product.created_at,
            category,
        }
    }
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self::from_product(product, None)
    }
}

/// Create product payload
#[derive(Debug, Clone, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub stock: i64,
    pub image: Option<String>,
    pub colors: Option<String>,
    pub sizes: Option<String>,
    #[serde(default)]
    pub featured: bool,
    pub category_id: Option<i64>,
}

/// Update payload — absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i64>,
    pub image: Option<String>,
    pub colors: Option<String>,
    pub sizes: Option<String>,
    pub featured: Option<bool>,
    pub category_id: Option<i64>,
}

/// Filters for the public product listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    #[serde(default)]
    pub skip: i64,
    pub limit: Option<i64>,
    pub featured: Option<bool>,
    pub category_id: Option<i64>,
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_trims_and_drops_blanks() {
        assert_eq!(
            parse_list(Some("Rojo, Azul ,, Verde")),
            vec!["Rojo", "Azul", "Verde"]
        );
        assert_eq!(parse_list(Some("")), Vec::<String>::new());
        assert_eq!(parse_list(None), Vec::<String>::new());
    }
}
