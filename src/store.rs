//! Persistent cart store
//!
//! Binds a [`Cart`] to a [`KeyValueStore`]. The store is the only owner of
//! the cart: every operation mutates it in place and then saves the current
//! contents, never a snapshot taken earlier.

use crate::cart::Cart;
use crate::config::CartConfig;
use crate::error::{CartError, Result};
use crate::item::{NewProduct, Product};
use crate::storage::KeyValueStore;

pub struct CartStore<S> {
    cart: Cart,
    storage: S,
    key: String,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Empty store; nothing is read until [`load`](Self::load)
    pub fn new(storage: S, config: &CartConfig) -> Self {
        Self {
            cart: Cart::new(),
            storage,
            key: config.products_key(),
        }
    }

    /// Create and load in one step
    pub fn open(storage: S, config: &CartConfig) -> Self {
        let mut store = Self::new(storage, config);
        store.load();
        store
    }

    /// Replace the in-memory cart with the persisted one.
    ///
    /// Fails open: missing, unreadable or malformed data yields an empty
    /// cart. Returns the number of lines loaded.
    pub fn load(&mut self) -> usize {
        self.cart = match self.read_persisted() {
            Ok(Some(cart)) => {
                log::info!("Loaded {} cart lines from '{}'", cart.len(), self.key);
                cart
            }
            Ok(None) => {
                log::info!("No saved cart under '{}', starting empty", self.key);
                Cart::new()
            }
            Err(e) => {
                log::warn!("Could not load cart, starting empty: {}", e);
                Cart::new()
            }
        };
        self.cart.len()
    }

    fn read_persisted(&self) -> Result<Option<Cart>> {
        let Some(json) = self.storage.get(&self.key)? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&json)?))
    }

    /// Write the current cart under the persistence key
    pub fn save(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.cart)?;
        match self.storage.set(&self.key, &json) {
            Ok(()) => {
                log::debug!("Cart saved ({} lines)", self.cart.len());
                Ok(())
            }
            Err(e) => {
                log::error!("Cart save failed, memory and storage now differ: {}", e);
                Err(CartError::Persistence(e))
            }
        }
    }

    pub fn products(&self) -> &[Product] {
        self.cart.products()
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Add one unit of `item` and save.
    ///
    /// Non-finite prices are refused with the cart untouched. A save error
    /// leaves the in-memory change in place.
    pub fn add_to_cart(&mut self, item: NewProduct) -> Result<()> {
        if !item.price.is_finite() {
            log::warn!("add_to_cart '{}': refusing price {}", item.id, item.price);
            return Err(CartError::InvalidPrice {
                id: item.id,
                price: item.price,
            });
        }
        log::debug!("add_to_cart '{}'", item.id);
        self.cart.add(item);
        self.save()
    }

    /// Add one unit to line `id` and save. `Ok(false)` if there is no such
    /// line; nothing is written in that case.
    pub fn increment(&mut self, id: &str) -> Result<bool> {
        if !self.cart.increment(id) {
            log::debug!("increment '{}': not in cart", id);
            return Ok(false);
        }
        log::debug!("increment '{}'", id);
        self.save()?;
        Ok(true)
    }

    /// Remove one unit from line `id` and save. `Ok(false)` if there is no
    /// such line or it is already at zero.
    pub fn decrement(&mut self, id: &str) -> Result<bool> {
        if !self.cart.decrement(id) {
            log::debug!("decrement '{}': absent or at zero", id);
            return Ok(false);
        }
        log::debug!("decrement '{}'", id);
        self.save()?;
        Ok(true)
    }
}
