//! Key-value storage backends
//!
//! The cart only needs string get/set against a fixed key:
//! - `MemoryStorage`: process-local map (tests, native without a data dir)
//! - `FileStorage`: one file per key (native)
//! - `LocalStorage`: browser `window.localStorage` (wasm32)

mod memory;
pub use memory::MemoryStorage;

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

#[cfg(target_arch = "wasm32")]
mod local;
#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;

use crate::error::StorageError;

/// String key-value store the cart persists into
pub trait KeyValueStore {
    /// Value stored under `key`, `None` if absent
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

