//! In-memory cart state
//!
//! Pure and storage-free: every mutation rule lives here so it can be tested
//! without a backend. Mutations report whether anything changed.

use serde::{Deserialize, Serialize};

use crate::item::{NewProduct, Product};

/// Ordered list of cart lines, at most one per product id.
///
/// Serialized as a plain JSON array; deserializing goes through
/// [`Cart::from_products`] so duplicates never get in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Product>", into = "Vec<Product>")]
pub struct Cart {
    products: Vec<Product>,
}

impl From<Vec<Product>> for Cart {
    fn from(products: Vec<Product>) -> Self {
        Self::from_products(products)
    }
}

impl From<Cart> for Vec<Product> {
    fn from(cart: Cart) -> Self {
        cart.products
    }
}

impl Cart {
    /// Create an empty cart
    pub fn new() -> Self {
        Self {
            products: Vec::new(),
        }
    }

    /// Build a cart from stored lines. Later duplicates of an id are dropped.
    pub fn from_products(products: Vec<Product>) -> Self {
        let mut cart = Self::new();
        for product in products {
            if cart.position(&product.id).is_some() {
                log::warn!("Dropping duplicate cart line '{}'", product.id);
                continue;
            }
            cart.products.push(product);
        }
        cart
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Sum of quantities over all lines
    pub fn total_quantity(&self) -> u64 {
        self.products.iter().map(|p| u64::from(p.quantity)).sum()
    }

    /// Sum of line subtotals
    pub fn total_price(&self) -> f64 {
        self.products.iter().map(Product::subtotal).sum()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.products.iter().position(|p| p.id == id)
    }

    /// Add a product. An existing line with the same id gets the new fields
    /// and one more unit; otherwise a line with quantity 1 is appended.
    pub fn add(&mut self, item: NewProduct) {
        match self.position(&item.id) {
            Some(i) => {
                let quantity = self.products[i].quantity.saturating_add(1);
                self.products[i] = item.with_quantity(quantity);
            }
            None => self.products.push(item.with_quantity(1)),
        }
    }

    /// Add one unit to an existing line. Returns false if the id is unknown.
    pub fn increment(&mut self, id: &str) -> bool {
        match self.products.iter_mut().find(|p| p.id == id) {
            Some(product) => {
                product.quantity = product.quantity.saturating_add(1);
                true
            }
            None => false,
        }
    }

    /// Remove one unit from an existing line. The line stays in the cart at
    /// zero. Returns false if the id is unknown or already at zero.
    pub fn decrement(&mut self, id: &str) -> bool {
        match self.products.iter_mut().find(|p| p.id == id) {
            Some(product) if product.quantity > 0 => {
                product.quantity -= 1;
                true
            }
            _ => false,
        }
    }
}
