use std::collections::HashMap;

use super::KeyValueStore;
use crate::error::StorageError;

/// In-memory key-value store.
///
/// Can be told to fail reads or writes, which is how the cart's error
/// paths are exercised.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    data: HashMap<String, String>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a key
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Make every subsequent `get` fail
    pub fn fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    /// Make every subsequent `set` fail
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads {
            return Err(StorageError::Read {
                key: key.to_string(),
                reason: "simulated read failure".to_string(),
            });
        }
        Ok(self.data.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Write {
                key: key.to_string(),
                reason: "simulated write failure".to_string(),
            });
        }
        self.data.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get("k").unwrap(), None);
        storage.set("k", "v").unwrap();
        storage.set("k", "w").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("w"));
    }

    #[test]
    fn test_simulated_failures() {
        let mut storage = MemoryStorage::new().with_entry("k", "v");
        storage.fail_writes(true);
        assert!(matches!(storage.set("k", "w"), Err(StorageError::Write { .. })));
        assert_eq!(storage.raw("k"), Some("v"));

        storage.fail_reads(true);
        assert!(matches!(storage.get("k"), Err(StorageError::Read { .. })));
    }
}
