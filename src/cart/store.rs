//! In-memory cart storage
//!
//! Carts live for the lifetime of the process; nothing is persisted and
//! entries never expire. The store is created once at startup and handed
//! to handlers through the server state. Mutations for one user happen
//! under that user's map entry lock, so two requests for the same cart
//! cannot interleave.

use std::collections::BTreeMap;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::utils::{AppError, AppResult, money};

/// One cart entry, holding a snapshot of the product at add-time.
/// Field names follow the storefront wire format.
#[derive(Debug, Clone, Serialize)]
pub struct CartItem {
    #[serde(rename = "producto_id")]
    pub product_id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "precio")]
    pub price: f64,
    #[serde(rename = "imagen")]
    pub image: Option<String>,
    #[serde(rename = "cantidad")]
    pub quantity: i64,
    #[serde(rename = "color_seleccionado")]
    pub color: Option<String>,
    #[serde(rename = "talla_seleccionada")]
    pub size: Option<String>,
}

impl CartItem {
    pub fn subtotal(&self) -> AppResult<f64> {
        money::line_subtotal(self.price, self.quantity)
    }
}

/// Product fields the cart needs when adding an entry
#[derive(Debug, Clone)]
pub struct ProductSnapshot {
    pub product_id: i64,
    pub name: String,
    pub price: f64,
    pub image: Option<String>,
    pub stock: i64,
}

/// Quantity adjustment for an existing entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum CartAction {
    #[serde(rename = "aumentar")]
    Increase,
    #[serde(rename = "disminuir")]
    Decrease,
}

type UserCart = BTreeMap<String, CartItem>;

/// Entries are keyed by (product, color, size) so the same product in a
/// different variant is a separate line.
pub fn entry_key(product_id: i64, color: Option<&str>, size: Option<&str>) -> String {
    format!(
        "{}_{}_{}",
        product_id,
        color.unwrap_or_default(),
        size.unwrap_or_default()
    )
}

/// Process-wide cart store, one cart per user id.
#[derive(Debug, Default)]
pub struct CartStore {
    carts: DashMap<i64, UserCart>,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current entries for a user, in key order.
    pub fn get(&self, user_id: i64) -> Vec<CartItem> {
        self.carts
            .get(&user_id)
            .map(|cart| cart.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Add `quantity` of a product variant, merging into an existing entry.
    ///
    /// The cumulative quantity (existing + requested) is checked against
    /// current stock, so repeated adds cannot pile up beyond what is
    /// actually available at add-time.
    pub fn add(
        &self,
        user_id: i64,
        product: &ProductSnapshot,
        quantity: i64,
        color: Option<String>,
        size: Option<String>,
    ) -> AppResult<CartItem> {
        money::validate_quantity(quantity)?;

        let key = entry_key(product.product_id, color.as_deref(), size.as_deref());
        let mut cart = self.carts.entry(user_id).or_default();

        let existing = cart.get(&key).map(|item| item.quantity).unwrap_or(0);
        let cumulative = existing + quantity;
        if cumulative > product.stock {
            return Err(AppError::InsufficientStock {
                product_id: product.product_id,
                name: product.name.clone(),
                available: product.stock,
                requested: cumulative,
            });
        }

        let item = cart
            .entry(key)
            .and_modify(|item| item.quantity = cumulative)
            .or_insert_with(|| CartItem {
                product_id: product.product_id,
                name: product.name.clone(),
                price: product.price,
                image: product.image.clone(),
                quantity,
                color,
                size,
            });
        Ok(item.clone())
    }

    /// Increment or decrement an entry; decrementing below 1 removes it.
    /// Returns the updated entry, or `None` when it was removed.
    pub fn update_quantity(
        &self,
        user_id: i64,
        key: &str,
        action: CartAction,
    ) -> AppResult<Option<CartItem>> {
        let mut cart = self
            .carts
            .get_mut(&user_id)
            .ok_or_else(|| AppError::not_found("Cart is empty"))?;

        let item = cart
            .get_mut(key)
            .ok_or_else(|| AppError::not_found(format!("Cart entry '{key}' not found")))?;

        match action {
            CartAction::Increase => {
                item.quantity += 1;
                Ok(Some(item.clone()))
            }
            CartAction::Decrease => {
                if item.quantity <= 1 {
                    cart.remove(key);
                    Ok(None)
                } else {
                    item.quantity -= 1;
                    Ok(Some(item.clone()))
                }
            }
        }
    }

    pub fn remove(&self, user_id: i64, key: &str) -> AppResult<()> {
        let mut cart = self
            .carts
            .get_mut(&user_id)
            .ok_or_else(|| AppError::not_found("Cart is empty"))?;
        cart.remove(key)
            .map(|_| ())
            .ok_or_else(|| AppError::not_found(format!("Cart entry '{key}' not found")))
    }

    pub fn clear(&self, user_id: i64) {
        self.carts.remove(&user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shirt() -> ProductSnapshot {
        ProductSnapshot {
            product_id: 1,
            name: "Camiseta".to_string(),
            price: 19.99,
            image: None,
            stock: 5,
        }
    }

    #[test]
    fn test_add_merges_same_variant() {
        let store = CartStore::new();
        store
            .add(7, &shirt(), 2, Some("Rojo".into()), Some("M".into()))
            .unwrap();
        let item = store
            .add(7, &shirt(), 1, Some("Rojo".into()), Some("M".into()))
            .unwrap();
        assert_eq!(item.quantity, 3);
        assert_eq!(store.get(7).len(), 1);
    }

    #[test]
    fn test_variants_are_separate_entries() {
        let store = CartStore::new();
        store
            .add(7, &shirt(), 1, Some("Rojo".into()), Some("M".into()))
            .unwrap();
        store
            .add(7, &shirt(), 1, Some("Azul".into()), Some("M".into()))
            .unwrap();
        assert_eq!(store.get(7).len(), 2);
    }

    #[test]
    fn test_cumulative_add_rejected_beyond_stock() {
        let store = CartStore::new();
        store.add(7, &shirt(), 4, None, None).unwrap();
        let err = store.add(7, &shirt(), 2, None, None).unwrap_err();
        assert!(matches!(
            err,
            AppError::InsufficientStock {
                available: 5,
                requested: 6,
                ..
            }
        ));
        // the failed add leaves the entry untouched
        assert_eq!(store.get(7)[0].quantity, 4);
    }

    #[test]
    fn test_decrease_below_one_removes_entry() {
        let store = CartStore::new();
        store.add(7, &shirt(), 1, None, None).unwrap();
        let key = entry_key(1, None, None);
        let removed = store.update_quantity(7, &key, CartAction::Decrease).unwrap();
        assert!(removed.is_none());
        assert!(store.get(7).is_empty());
    }

    #[test]
    fn test_clear_drops_whole_cart() {
        let store = CartStore::new();
        store.add(7, &shirt(), 2, None, None).unwrap();
        store.clear(7);
        assert!(store.get(7).is_empty());
    }

    #[test]
    fn test_carts_are_per_user() {
        let store = CartStore::new();
        store.add(1, &shirt(), 2, None, None).unwrap();
        assert!(store.get(2).is_empty());
    }
}
