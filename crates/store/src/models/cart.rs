//! Cart domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use mercadito_core::CartId;

use super::Product;

/// A shopping cart with its populated line items.
#[derive(Debug, Clone, Serialize)]
pub struct Cart {
    /// Unique cart ID.
    pub id: CartId,
    /// When the cart was created.
    pub created_at: DateTime<Utc>,
    /// Line items, one per product.
    pub products: Vec<CartItem>,
}

/// One cart line: a product and how many units of it.
#[derive(Debug, Clone, Serialize)]
pub struct CartItem {
    pub product: Product,
    pub quantity: i32,
}

impl Cart {
    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> i64 {
        self.products.iter().map(|i| i64::from(i.quantity)).sum()
    }

    /// Sum of line totals, preformatted for display.
    #[must_use]
    pub fn display_total(&self) -> String {
        let total: rust_decimal::Decimal = self
            .products
            .iter()
            .map(|i| i.product.price * rust_decimal::Decimal::from(i.quantity))
            .sum();
        format!("${total:.2}")
    }
}
