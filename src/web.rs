//! JavaScript-facing cart (wasm32 only)
//!
//! Wraps a [`CartContext`] over browser LocalStorage so a JS/TS UI can use
//! the cart without touching Rust types. Products cross the boundary as JSON.

use wasm_bindgen::prelude::*;

use crate::config::CartConfig;
use crate::error::CartError;
use crate::item::NewProduct;
use crate::provider::{CartContext, CartProvider, SubscriptionId};
use crate::storage::LocalStorage;

fn to_js(err: CartError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

#[wasm_bindgen]
pub struct WebCart {
    context: CartContext,
}

#[wasm_bindgen]
impl WebCart {
    /// Open the cart stored under `namespace` (default namespace if empty)
    #[wasm_bindgen(constructor)]
    pub fn new(namespace: Option<String>) -> Result<WebCart, JsValue> {
        let config = match namespace.filter(|n| !n.is_empty()) {
            Some(ns) => CartConfig::with_namespace(ns),
            None => CartConfig::default(),
        };
        let storage = LocalStorage::open().map_err(|e| to_js(e.into()))?;
        let mut provider = CartProvider::new();
        provider.init(storage, &config);
        let context = provider.use_cart().map_err(to_js)?;
        Ok(WebCart { context })
    }

    /// Current lines as a JSON array
    pub fn products(&self) -> Result<String, JsValue> {
        self.context
            .with_products(|products| serde_json::to_string(products))
            .map_err(|e| to_js(e.into()))
    }

    #[wasm_bindgen(js_name = addToCart)]
    pub fn add_to_cart(
        &self,
        id: String,
        title: String,
        image_url: String,
        price: f64,
    ) -> Result<(), JsValue> {
        self.context
            .add_to_cart(NewProduct::new(id, title, image_url, price))
            .map_err(to_js)
    }

    pub fn increment(&self, id: &str) -> Result<bool, JsValue> {
        self.context.increment(id).map_err(to_js)
    }

    pub fn decrement(&self, id: &str) -> Result<bool, JsValue> {
        self.context.decrement(id).map_err(to_js)
    }

    #[wasm_bindgen(js_name = totalQuantity)]
    pub fn total_quantity(&self) -> f64 {
        self.context.total_quantity() as f64
    }

    #[wasm_bindgen(js_name = totalPrice)]
    pub fn total_price(&self) -> f64 {
        self.context.total_price()
    }

    /// Call `callback(json)` with the product list after every change.
    /// Returns an id for [`unsubscribe`](Self::unsubscribe); components must
    /// release it on unmount.
    pub fn subscribe(&self, callback: js_sys::Function) -> f64 {
        let id = self.context.subscribe(move |products| {
            match serde_json::to_string(products) {
                Ok(json) => {
                    if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
                        log::warn!("Cart subscriber threw: {:?}", e);
                    }
                }
                Err(e) => log::error!("Could not serialize cart for subscriber: {}", e),
            }
        });
        // Ids are sequential from zero, far below 2^53
        id.as_raw() as f64
    }

    /// Returns false if `id` is not a live subscription
    pub fn unsubscribe(&self, id: f64) -> bool {
        if !(id.is_finite() && id >= 0.0 && id.fract() == 0.0) {
            return false;
        }
        self.context.unsubscribe(SubscriptionId::from_raw(id as u64))
    }
}
