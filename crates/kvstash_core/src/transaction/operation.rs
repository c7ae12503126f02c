//! Mutations that can be buffered, applied and inverted.

use crate::error::{CoreError, CoreResult};
use crate::record::Value;
use serde::{Deserialize, Serialize};
use serde_json::Map;
use std::fmt;

/// A single mutation of the store.
///
/// The same type describes buffered client calls and the inverses the
/// commit engine records for rollback.
///
/// Serialized with an `op` tag, e.g. `{"op":"insert","key":"a","value":1}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Operation {
    /// Add a key that must not exist yet.
    Insert {
        /// Target key.
        key: String,
        /// Value to store.
        value: Value,
    },
    /// Replace the value of a key that must exist.
    Update {
        /// Target key.
        key: String,
        /// Value to store.
        value: Value,
    },
    /// Remove a key that must exist.
    Delete {
        /// Target key.
        key: String,
    },
}

impl Operation {
    /// Creates an insert.
    pub fn insert(key: impl Into<String>, value: Value) -> Self {
        Self::Insert {
            key: key.into(),
            value,
        }
    }

    /// Creates an update.
    pub fn update(key: impl Into<String>, value: Value) -> Self {
        Self::Update {
            key: key.into(),
            value,
        }
    }

    /// Creates a delete.
    pub fn delete(key: impl Into<String>) -> Self {
        Self::Delete { key: key.into() }
    }

    /// Returns the key this operation targets.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Insert { key, .. } | Self::Update { key, .. } | Self::Delete { key } => key,
        }
    }

    /// Returns the operation name.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Insert { .. } => "insert",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
        }
    }

    /// Checks the key precondition against `map` without changing it.
    pub(crate) fn validate(&self, map: &Map<String, Value>) -> CoreResult<()> {
        let present = map.contains_key(self.key());
        match self {
            Self::Insert { key, .. } if present => Err(CoreError::key_already_exists(key.as_str())),
            Self::Update { key, .. } | Self::Delete { key } if !present => {
                Err(CoreError::key_not_found(key.as_str()))
            }
            _ => Ok(()),
        }
    }

    /// Validates and then applies the operation to `map`.
    ///
    /// On error `map` is left untouched.
    pub(crate) fn apply_to(&self, map: &mut Map<String, Value>) -> CoreResult<()> {
        self.validate(map)?;
        match self {
            Self::Insert { key, value } | Self::Update { key, value } => {
                map.insert(key.clone(), value.clone());
            }
            Self::Delete { key } => {
                map.shift_remove(key);
            }
        }
        Ok(())
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind(), self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map_of(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn insert_adds_missing_key() {
        let mut map = Map::new();
        Operation::insert("a", json!(1)).apply_to(&mut map).unwrap();
        assert_eq!(map.get("a"), Some(&json!(1)));
    }

    #[test]
    fn insert_rejects_present_key() {
        let mut map = map_of(&[("a", json!(1))]);
        let result = Operation::insert("a", json!(2)).apply_to(&mut map);

        assert!(matches!(result, Err(CoreError::KeyAlreadyExists { .. })));
        assert_eq!(map.get("a"), Some(&json!(1)));
    }

    #[test]
    fn update_replaces_in_place() {
        let mut map = map_of(&[("a", json!(1)), ("b", json!(2))]);
        Operation::update("a", json!(9)).apply_to(&mut map).unwrap();

        assert_eq!(map.get("a"), Some(&json!(9)));
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn update_and_delete_reject_missing_key() {
        let mut map = Map::new();

        let update = Operation::update("x", json!(1)).apply_to(&mut map);
        assert!(matches!(update, Err(CoreError::KeyNotFound { .. })));

        let delete = Operation::delete("x").apply_to(&mut map);
        assert!(matches!(delete, Err(CoreError::KeyNotFound { .. })));
        assert!(map.is_empty());
    }

    #[test]
    fn delete_keeps_remaining_order() {
        let mut map = map_of(&[("a", json!(1)), ("b", json!(2)), ("c", json!(3))]);
        Operation::delete("a").apply_to(&mut map).unwrap();

        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["b", "c"]);
    }

    #[test]
    fn serde_uses_op_tag() {
        let op = Operation::insert("a", json!({"n": 1}));
        let encoded = serde_json::to_value(&op).unwrap();
        assert_eq!(encoded, json!({"op": "insert", "key": "a", "value": {"n": 1}}));

        let decoded: Operation = serde_json::from_value(json!({"op": "delete", "key": "b"})).unwrap();
        assert_eq!(decoded, Operation::delete("b"));
    }

    #[test]
    fn display_names_kind_and_key() {
        assert_eq!(Operation::update("k", json!(null)).to_string(), "update(k)");
    }
}
