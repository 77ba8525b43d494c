use std::cell::RefCell;
use std::collections::HashMap;

use super::KeyValueStore;
use crate::error::StorageError;

/// In-memory key-value store for native builds and tests.
///
/// Uses `RefCell` since the gradebook is single-threaded, which lets the
/// `KeyValueStore` trait take `&self` like the browser Storage API.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
    simulate_write_error: RefCell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if *self.simulate_write_error.borrow() {
            return Err(StorageError::Write("simulated write error".into()));
        }
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        if *self.simulate_write_error.borrow() {
            return Err(StorageError::Write("simulated write error".into()));
        }
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get_item("k").unwrap(), None);
        store.set_item("k", "v").unwrap();
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("v"));
        store.set_item("k", "w").unwrap();
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("w"));
        assert_eq!(store.len(), 1);
        store.remove_item("k").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_simulated_write_error() {
        let store = MemoryStore::new();
        store.set_item("k", "v").unwrap();
        store.set_simulate_write_error(true);
        assert!(store.set_item("k", "w").is_err());
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("v"));
        store.set_simulate_write_error(false);
        assert!(store.set_item("k", "w").is_ok());
    }
}
