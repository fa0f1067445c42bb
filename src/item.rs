//! Cart line items
//!
//! Field names match the JSON written by earlier clients, so existing
//! persisted carts keep loading.

use serde::{Deserialize, Serialize};

/// A product line in the cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique within a cart
    pub id: String,
    pub title: String,
    /// Image reference (usually a URL)
    pub image_url: String,
    /// Unit price
    pub price: f64,
    #[serde(default)]
    pub quantity: u32,
}

impl Product {
    /// Line total (unit price times quantity)
    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// A product as handed to `add_to_cart`, before it has a quantity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub price: f64,
}

impl NewProduct {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            price,
        }
    }

    /// Attach a quantity, producing a cart line
    pub fn with_quantity(self, quantity: u32) -> Product {
        Product {
            id: self.id,
            title: self.title,
            image_url: self.image_url,
            price: self.price,
            quantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_quantity_defaults_to_zero() {
        let json = r#"{"id":"a","title":"T","image_url":"u","price":10}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.quantity, 0);
        assert_eq!(product.price, 10.0);
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let json = r#"{"id":"a","title":"T","image_url":"u","price":10,"quantity":-1}"#;
        assert!(serde_json::from_str::<Product>(json).is_err());
    }

    #[test]
    fn test_subtotal() {
        let product = NewProduct::new("a", "T", "u", 2.5).with_quantity(4);
        assert!((product.subtotal() - 10.0).abs() < f64::EPSILON);
    }
}
