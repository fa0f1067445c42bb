//! Cart store configuration
//!
//! Controls where the cart is persisted. On the web only the namespace
//! matters; native builds may also point at a storage directory.

use std::path::PathBuf;

/// Namespace used by earlier clients; keeps existing carts readable
pub const DEFAULT_NAMESPACE: &str = "@Challenge08";

/// Environment variable overriding the namespace
pub const ENV_NAMESPACE: &str = "CART_NAMESPACE";
/// Environment variable selecting the native storage directory
pub const ENV_STORAGE_DIR: &str = "CART_STORAGE_DIR";

#[derive(Debug, Clone, PartialEq)]
pub struct CartConfig {
    /// Prefix of the persistence key
    pub namespace: String,
    /// Directory for file-backed storage (native only). `None` keeps the
    /// cart in memory.
    pub storage_dir: Option<PathBuf>,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            storage_dir: None,
        }
    }
}

impl CartConfig {
    pub fn with_namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Default::default()
        }
    }

    /// Key the serialized cart is stored under
    pub fn products_key(&self) -> String {
        format!("{}:products", self.namespace)
    }

    /// Defaults overlaid with `CART_NAMESPACE` / `CART_STORAGE_DIR`
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overlaid with values from an arbitrary variable source.
    /// Empty values are ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(namespace) = lookup(ENV_NAMESPACE).filter(|v| !v.trim().is_empty()) {
            config.namespace = namespace.trim().to_string();
        }
        if let Some(dir) = lookup(ENV_STORAGE_DIR).filter(|v| !v.trim().is_empty()) {
            config.storage_dir = Some(PathBuf::from(dir.trim()));
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_key() {
        assert_eq!(CartConfig::default().products_key(), "@Challenge08:products");
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = CartConfig::from_lookup(|name| match name {
            ENV_NAMESPACE => Some("@Shop".to_string()),
            ENV_STORAGE_DIR => Some("/tmp/cart".to_string()),
            _ => None,
        });
        assert_eq!(config.products_key(), "@Shop:products");
        assert_eq!(config.storage_dir, Some(PathBuf::from("/tmp/cart")));
    }

    #[test]
    fn test_from_lookup_ignores_blank() {
        let config = CartConfig::from_lookup(|_| Some("  ".to_string()));
        assert_eq!(config, CartConfig::default());
    }
}
