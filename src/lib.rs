//! Cart Store - persistent shopping-cart state for mobile and web clients
//!
//! Core modules:
//! - `item`: Cart line data model
//! - `cart`: Pure in-memory cart rules (add / increment / decrement)
//! - `storage`: Key-value backends (memory, file, browser LocalStorage)
//! - `store`: Cart bound to storage, saved after every mutation
//! - `provider`: Provider/context handed to UI components
//! - `config`: Persistence namespace and storage location
//! - `web`: JS bindings (wasm32 only)

pub mod cart;
pub mod config;
pub mod error;
pub mod item;
pub mod provider;
pub mod storage;
pub mod store;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use cart::Cart;
pub use config::CartConfig;
pub use error::{CartError, StorageError};
pub use item::{NewProduct, Product};
pub use provider::{CartContext, CartProvider, SubscriptionId};
pub use storage::{KeyValueStore, MemoryStorage};
pub use store::CartStore;
