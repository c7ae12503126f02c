//! File-backed store with deferred-execution transactions.

use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::record::{Record, Value};
use crate::storage::{matching_keys, Storage};
use crate::transaction::{
    replay, Operation, OperationApplier, RollbackReport, Transaction, TransactionState,
};
use kvstash_storage::{FileBackend, StorageBackend};
use serde_json::Map;
use std::path::Path;
use tracing::{debug, info};

/// A key-value store persisted as one JSON object.
///
/// The store keeps an in-memory mirror of the persisted map. Every
/// successful write replaces the whole persisted image, so the backing file
/// always holds a complete map.
///
/// # Modes
///
/// - **Direct** (no open transaction): `insert`, `update` and `delete`
///   validate against the mirror, persist, and only then adopt the change.
///   A failed call leaves both mirror and file unchanged.
/// - **Buffering** (after [`Storage::begin`]): the same calls are recorded
///   without validation and return as if they had succeeded. Reads keep
///   seeing the mirror, which does not include buffered operations.
///
/// [`Storage::commit`] replays the buffer step by step against freshly
/// reloaded durable state, undoing the applied steps if one fails.
///
/// # Example
///
/// ```rust,no_run
/// use kvstash_core::{Config, JsonStore, Storage};
/// use serde_json::json;
///
/// let mut store = JsonStore::open(Config::new().path("data.json")).unwrap();
/// store.insert("key", json!("value")).unwrap();
/// assert_eq!(store.select("key").unwrap(), json!("value"));
/// ```
pub struct JsonStore {
    config: Config,
    backend: Box<dyn StorageBackend>,
    memory: Map<String, Value>,
    transaction: Option<Transaction>,
}

impl JsonStore {
    /// Opens the store file named by `config.path`.
    ///
    /// Parent directories are created as needed; the file itself is created
    /// by the first write.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or is not a
    /// JSON object, or if it is missing and `create_if_missing` is false.
    pub fn open(config: Config) -> CoreResult<Self> {
        let backend =
            FileBackend::open_with_create_dirs(&config.path)?.with_sync(config.sync_on_write);
        Self::open_with_backend(config, Box::new(backend))
    }

    /// Opens a store on an explicit backend.
    ///
    /// `config.path` is only used for diagnostics.
    ///
    /// # Errors
    ///
    /// Same as [`JsonStore::open`].
    pub fn open_with_backend(config: Config, backend: Box<dyn StorageBackend>) -> CoreResult<Self> {
        if !config.create_if_missing && !backend.exists()? {
            return Err(CoreError::StoreNotFound {
                path: config.path.clone(),
            });
        }

        let memory = load(backend.as_ref())?;
        debug!(path = %config.path.display(), keys = memory.len(), "store opened");

        Ok(Self {
            config,
            backend,
            memory,
            transaction: None,
        })
    }

    /// Returns the configuration the store was opened with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the path of the store file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Returns whether a transaction is open.
    #[must_use]
    pub fn state(&self) -> TransactionState {
        match self.transaction {
            Some(_) => TransactionState::Open,
            None => TransactionState::Closed,
        }
    }

    /// Returns the buffered operations of the open transaction.
    ///
    /// Empty when no transaction is open.
    #[must_use]
    pub fn pending(&self) -> &[Operation] {
        self.transaction
            .as_ref()
            .map(Transaction::pending)
            .unwrap_or_default()
    }

    /// Returns the number of keys in the mirror.
    #[must_use]
    pub fn len(&self) -> usize {
        self.memory.len()
    }

    /// Returns whether the mirror holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }

    /// Routes a mutation by mode: buffered while a transaction is open,
    /// applied and persisted otherwise.
    fn submit(&mut self, operation: Operation) -> CoreResult<()> {
        match self.transaction.as_mut() {
            Some(transaction) => {
                debug!(op = %operation, buffered = transaction.len() + 1, "operation buffered");
                transaction.push(operation);
                Ok(())
            }
            None => self.apply(&operation),
        }
    }

    fn persist(&mut self, map: &Map<String, Value>) -> CoreResult<()> {
        let data = if self.config.pretty {
            serde_json::to_vec_pretty(map)?
        } else {
            serde_json::to_vec(map)?
        };
        self.backend.replace(&data)?;
        Ok(())
    }
}

/// Decodes the persisted image; a missing or blank image is an empty map.
fn load(backend: &dyn StorageBackend) -> CoreResult<Map<String, Value>> {
    let Some(data) = backend.read_all()? else {
        return Ok(Map::new());
    };

    if data.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }

    match serde_json::from_slice::<Value>(&data)? {
        Value::Object(map) => Ok(map),
        other => Err(CoreError::invalid_format(format!(
            "expected a JSON object at the top level, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl OperationApplier for JsonStore {
    fn reload(&mut self) -> CoreResult<()> {
        self.memory = load(self.backend.as_ref())?;
        Ok(())
    }

    fn current_value(&self, key: &str) -> CoreResult<Value> {
        self.memory
            .get(key)
            .cloned()
            .ok_or_else(|| CoreError::key_not_found(key))
    }

    fn apply(&mut self, operation: &Operation) -> CoreResult<()> {
        operation.validate(&self.memory)?;

        let mut next = self.memory.clone();
        operation.apply_to(&mut next)?;
        self.persist(&next)?;
        self.memory = next;
        Ok(())
    }
}

impl Storage for JsonStore {
    fn insert(&mut self, key: &str, value: Value) -> CoreResult<Record> {
        self.submit(Operation::insert(key, value.clone()))?;
        Ok(Record::new(key, value))
    }

    fn select(&self, key: &str) -> CoreResult<Value> {
        self.current_value(key)
    }

    fn update(&mut self, key: &str, value: Value) -> CoreResult<Record> {
        self.submit(Operation::update(key, value.clone()))?;
        Ok(Record::new(key, value))
    }

    fn delete(&mut self, key: &str) -> CoreResult<()> {
        self.submit(Operation::delete(key))
    }

    fn exists(&self, key: &str) -> bool {
        self.memory.contains_key(key)
    }

    fn keys(&self, pattern: Option<&str>) -> CoreResult<Vec<String>> {
        matching_keys(self.memory.keys(), pattern)
    }

    fn kind(&self) -> &'static str {
        "json"
    }

    /// Opens a transaction.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::TransactionAlreadyOpen`] if one is open; the
    /// open transaction and its buffer are left as they were.
    fn begin(&mut self) -> CoreResult<()> {
        if self.transaction.is_some() {
            return Err(CoreError::TransactionAlreadyOpen);
        }
        self.transaction = Some(Transaction::new());
        debug!("transaction opened");
        Ok(())
    }

    /// Replays the buffered operations and closes the transaction.
    ///
    /// The transaction is closed on every path, including failures.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NoActiveTransaction`] if no transaction is open
    /// - [`CoreError::TransactionAborted`] if a step failed; the steps
    ///   before it have been rolled back as reported
    /// - the reload error if durable state could not be read before the
    ///   first step, in which case nothing was applied
    fn commit(&mut self) -> CoreResult<()> {
        let transaction = self
            .transaction
            .take()
            .ok_or(CoreError::NoActiveTransaction)?;
        let operations = transaction.into_operations();
        debug!(operations = operations.len(), "committing transaction");

        let applied = replay(self, operations)?;
        info!(applied, "transaction committed");
        Ok(())
    }

    /// Closes the open transaction without applying its buffer.
    ///
    /// Buffered operations are never applied before commit, so nothing
    /// durable is undone and the report is always clean.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NoActiveTransaction`] if no transaction is open.
    fn rollback(&mut self) -> CoreResult<RollbackReport> {
        let transaction = self
            .transaction
            .take()
            .ok_or(CoreError::NoActiveTransaction)?;
        info!(discarded = transaction.len(), "transaction rolled back");

        Ok(RollbackReport::default())
    }
}

impl std::fmt::Debug for JsonStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonStore")
            .field("path", &self.config.path)
            .field("keys", &self.memory.len())
            .field("state", &self.state())
            .field("pending", &self.pending().len())
            .finish()
    }
}
