//! The storage capability shared by every store.

use crate::error::{CoreError, CoreResult};
use crate::record::{Record, Value};
use crate::transaction::RollbackReport;
use regex::Regex;

/// CRUD operations every kvstash store provides.
///
/// # Invariants
///
/// - Keys are unique within a store
/// - `insert` fails with [`CoreError::KeyAlreadyExists`] on a present key
/// - `select`, `update` and `delete` fail with [`CoreError::KeyNotFound`]
///   on an absent key
/// - `keys` reports keys in insertion order
///
/// Transaction control is part of the trait so that callers holding a
/// `Box<dyn Storage>` from [`crate::open_store`] can drive it uniformly.
/// Stores without transaction support keep the default bodies, which fail
/// with [`CoreError::TransactionsUnsupported`].
///
/// # Implementors
///
/// - [`crate::MemoryStore`] - In-memory baseline
/// - [`crate::JsonStore`] - File-backed, transactional
pub trait Storage: Send {
    /// Inserts a new key.
    fn insert(&mut self, key: &str, value: Value) -> CoreResult<Record>;

    /// Returns the value stored under `key`.
    fn select(&self, key: &str) -> CoreResult<Value>;

    /// Replaces the value of an existing key.
    fn update(&mut self, key: &str, value: Value) -> CoreResult<Record>;

    /// Removes an existing key.
    fn delete(&mut self, key: &str) -> CoreResult<()>;

    /// Returns whether `key` is present.
    fn exists(&self, key: &str) -> bool;

    /// Lists keys in insertion order.
    ///
    /// With a pattern, only keys in which the regular expression finds a
    /// match (anywhere, not necessarily the whole key) are returned.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidPattern`] if `pattern` does not compile.
    fn keys(&self, pattern: Option<&str>) -> CoreResult<Vec<String>>;

    /// Returns the kind name used in diagnostics.
    fn kind(&self) -> &'static str;

    /// Opens a transaction.
    fn begin(&mut self) -> CoreResult<()> {
        Err(CoreError::TransactionsUnsupported { store: self.kind() })
    }

    /// Applies the open transaction.
    fn commit(&mut self) -> CoreResult<()> {
        Err(CoreError::TransactionsUnsupported { store: self.kind() })
    }

    /// Abandons the open transaction.
    fn rollback(&mut self) -> CoreResult<RollbackReport> {
        Err(CoreError::TransactionsUnsupported { store: self.kind() })
    }
}

/// Filters `keys` by an optional search pattern, keeping their order.
pub(crate) fn matching_keys<'a, I>(keys: I, pattern: Option<&str>) -> CoreResult<Vec<String>>
where
    I: IntoIterator<Item = &'a String>,
{
    let Some(pattern) = pattern else {
        return Ok(keys.into_iter().cloned().collect());
    };

    let regex = Regex::new(pattern)?;
    Ok(keys
        .into_iter()
        .filter(|key| regex.is_match(key))
        .cloned()
        .collect())
}
