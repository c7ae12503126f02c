//! CLI command implementations.

pub mod crud;
pub mod transact;

use kvstash_core::Value;

/// Parses a command-line value as JSON, falling back to a plain string.
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
