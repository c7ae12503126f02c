//! In-memory baseline store.

use crate::error::{CoreError, CoreResult};
use crate::record::{Record, Value};
use crate::storage::{matching_keys, Storage};
use crate::transaction::Operation;
use serde_json::Map;

/// A plain insertion-ordered map behind the [`Storage`] interface.
///
/// Every call validates and mutates in place. Nothing is persisted and
/// transactions are not supported.
#[derive(Debug, Default)]
pub struct MemoryStore {
    memory: Map<String, Value>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.memory.len()
    }

    /// Returns whether the store holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }
}

impl Storage for MemoryStore {
    fn insert(&mut self, key: &str, value: Value) -> CoreResult<Record> {
        Operation::insert(key, value.clone()).apply_to(&mut self.memory)?;
        Ok(Record::new(key, value))
    }

    fn select(&self, key: &str) -> CoreResult<Value> {
        self.memory
            .get(key)
            .cloned()
            .ok_or_else(|| CoreError::key_not_found(key))
    }

    fn update(&mut self, key: &str, value: Value) -> CoreResult<Record> {
        Operation::update(key, value.clone()).apply_to(&mut self.memory)?;
        Ok(Record::new(key, value))
    }

    fn delete(&mut self, key: &str) -> CoreResult<()> {
        Operation::delete(key).apply_to(&mut self.memory)
    }

    fn exists(&self, key: &str) -> bool {
        self.memory.contains_key(key)
    }

    fn keys(&self, pattern: Option<&str>) -> CoreResult<Vec<String>> {
        matching_keys(self.memory.keys(), pattern)
    }

    fn kind(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn crud_cycle() {
        let mut store = MemoryStore::new();

        assert_eq!(
            store.insert("key", json!("value")).unwrap(),
            Record::new("key", json!("value"))
        );
        assert_eq!(store.select("key").unwrap(), json!("value"));

        store.update("key", json!("new_value")).unwrap();
        assert_eq!(store.select("key").unwrap(), json!("new_value"));

        store.delete("key").unwrap();
        assert!(!store.exists("key"));
        assert!(store.is_empty());
    }

    #[test]
    fn key_errors() {
        let mut store = MemoryStore::new();
        store.insert("a", json!(1)).unwrap();

        assert!(matches!(
            store.insert("a", json!(2)),
            Err(CoreError::KeyAlreadyExists { .. })
        ));
        assert!(matches!(store.select("b"), Err(CoreError::KeyNotFound { .. })));
        assert!(matches!(
            store.update("b", json!(1)),
            Err(CoreError::KeyNotFound { .. })
        ));
        assert!(matches!(store.delete("b"), Err(CoreError::KeyNotFound { .. })));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn transactions_unsupported() {
        let mut store = MemoryStore::new();

        assert!(matches!(
            store.begin(),
            Err(CoreError::TransactionsUnsupported { store: "memory" })
        ));
        assert!(store.commit().is_err());
        assert!(store.rollback().is_err());
    }

    proptest! {
        #[test]
        fn keys_keep_insertion_order(keys in prop::collection::hash_set("[a-z]{1,8}", 0..20)) {
            let keys: Vec<String> = keys.into_iter().collect();
            let mut store = MemoryStore::new();
            for key in &keys {
                store.insert(key, json!(null)).unwrap();
            }

            prop_assert_eq!(store.keys(None).unwrap(), keys);
        }
    }
}
