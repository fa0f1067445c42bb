//! Error types for the cart store and its storage backends

use thiserror::Error;

/// Failures reported by a key-value storage backend
#[derive(Debug, Error)]
pub enum StorageError {
    /// Backend cannot be reached at all (no window, no localStorage, ...)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to read '{key}': {reason}")]
    Read { key: String, reason: String },

    #[error("Failed to write '{key}': {reason}")]
    Write { key: String, reason: String },

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced to cart consumers
#[derive(Debug, Error)]
pub enum CartError {
    /// The cart context was used outside an initialized provider
    #[error("Cart used before its provider was initialized")]
    NotInitialized,

    /// The in-memory cart changed but could not be saved
    #[error("Failed to persist cart: {0}")]
    Persistence(#[from] StorageError),

    #[error("Failed to serialize cart: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Rejected before touching the cart; JSON has no encoding for it
    #[error("Product '{id}' has a non-finite price ({price})")]
    InvalidPrice { id: String, price: f64 },
}

impl CartError {
    /// True for errors caused by misuse of the API rather than by storage
    pub fn is_configuration(&self) -> bool {
        matches!(self, CartError::NotInitialized)
    }

    /// True if the operation was refused and the cart left unchanged
    pub fn is_rejection(&self) -> bool {
        matches!(self, CartError::InvalidPrice { .. })
    }
}

pub type Result<T, E = CartError> = std::result::Result<T, E>;
