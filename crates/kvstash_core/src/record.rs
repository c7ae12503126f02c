//! Records and values.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// A stored value: any JSON scalar or structure.
pub use serde_json::Value;

/// A key together with its value, as returned by `insert` and `update`.
///
/// Serializes as the single-entry object `{key: value}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    key: String,
    value: Value,
}

impl Record {
    /// Creates a new record.
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    /// Returns the key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the value.
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.key, &self.value)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_accessors() {
        let record = Record::new("key", json!("value"));
        assert_eq!(record.key(), "key");
        assert_eq!(record.value(), &json!("value"));
    }

    #[test]
    fn record_serializes_as_single_entry_object() {
        let record = Record::new("user", json!({"name": "ada", "age": 36}));
        let encoded = serde_json::to_value(&record).unwrap();
        assert_eq!(encoded, json!({"user": {"name": "ada", "age": 36}}));
    }
}
