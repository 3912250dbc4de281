//! Process-local key-value store.

use super::{KeyValueStore, KvResult};
use std::cell::RefCell;
use std::collections::BTreeMap;

/// In-memory `KeyValueStore`; contents are dropped with the value.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    items: RefCell<BTreeMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get_item(&self, key: &str) -> KvResult<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> KvResult<()> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> KvResult<()> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryKeyValueStore;
    use crate::kv::KeyValueStore;

    #[test]
    fn set_replaces_whole_value_and_remove_clears_key() {
        let store = MemoryKeyValueStore::new();
        assert_eq!(store.get_item("users").unwrap(), None);

        store.set_item("users", "[]").unwrap();
        store.set_item("users", "[1]").unwrap();
        assert_eq!(store.get_item("users").unwrap().as_deref(), Some("[1]"));
        assert_eq!(store.len(), 1);

        store.remove_item("users").unwrap();
        store.remove_item("users").unwrap();
        assert!(store.is_empty());
    }
}
