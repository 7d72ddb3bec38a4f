//! Product domain type.

use rust_decimal::Decimal;
use serde::Serialize;

use mercadito_core::ProductId;

/// A catalog product.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Long-form description.
    pub description: String,
    /// Merchant SKU code (unique).
    pub code: String,
    /// Unit price.
    pub price: Decimal,
    /// Whether the product is visible in the catalog.
    pub status: bool,
    /// Units available.
    pub stock: i32,
    /// Category label used for list filtering.
    pub category: String,
    /// Image URLs.
    pub thumbnails: Vec<String>,
}

impl Product {
    /// Price preformatted for display (e.g. "$19.99").
    #[must_use]
    pub fn display_price(&self) -> String {
        format!("${:.2}", self.price)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_price_two_decimals() {
        let product = Product {
            id: ProductId::new(1),
            title: "Yerba Mate".to_string(),
            description: "1kg bag".to_string(),
            code: "YM-001".to_string(),
            price: Decimal::new(1250, 2),
            status: true,
            stock: 40,
            category: "almacen".to_string(),
            thumbnails: vec![],
        };
        assert_eq!(product.display_price(), "$12.50");
    }
}
