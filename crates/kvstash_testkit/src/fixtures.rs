//! Test fixtures and store helpers.
//!
//! Provides convenience functions for setting up test stores and common
//! test scenarios.

use crate::faulty::{FaultHandle, FaultyBackend};
use kvstash_core::{Config, JsonStore, Storage, Value};
use kvstash_storage::InMemoryBackend;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Name of the store file inside a fixture's temporary directory.
pub const FIXTURE_FILE: &str = "store.json";

/// A test store with automatic cleanup.
pub struct TestStore {
    /// The store instance.
    pub store: JsonStore,
    /// Handle on the in-memory image, if the store is not file-backed.
    pub backend: Option<InMemoryBackend>,
    /// The temporary directory (kept alive to prevent cleanup).
    _temp_dir: Option<TempDir>,
}

impl TestStore {
    /// Creates a store on an in-memory backend.
    pub fn memory() -> Self {
        let backend = InMemoryBackend::new();
        let store = JsonStore::open_with_backend(Config::default(), Box::new(backend.clone()))
            .expect("Failed to open in-memory store");

        Self {
            store,
            backend: Some(backend),
            _temp_dir: None,
        }
    }

    /// Creates a store backed by a file in a fresh temporary directory.
    pub fn file() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let config = Config::new()
            .path(temp_dir.path().join(FIXTURE_FILE))
            .sync_on_write(false);
        let store = JsonStore::open(config).expect("Failed to open file store");

        Self {
            store,
            backend: None,
            _temp_dir: Some(temp_dir),
        }
    }

    /// Creates an in-memory store whose writes and reads can be failed.
    pub fn faulty() -> (Self, FaultHandle) {
        let backend = InMemoryBackend::new();
        let faulty = FaultyBackend::new(Box::new(backend.clone()));
        let handle = faulty.handle();
        let store = JsonStore::open_with_backend(Config::default(), Box::new(faulty))
            .expect("Failed to open faulty store");

        (
            Self {
                store,
                backend: Some(backend),
                _temp_dir: None,
            },
            handle,
        )
    }

    /// Returns the store file path if file-based, None if in-memory.
    pub fn path(&self) -> Option<PathBuf> {
        self._temp_dir.as_ref().map(|d| d.path().join(FIXTURE_FILE))
    }

    /// Opens a second, independent store instance over the same durable
    /// state.
    pub fn reopen(&self) -> JsonStore {
        match (&self.backend, self.path()) {
            (Some(backend), _) => {
                JsonStore::open_with_backend(Config::default(), Box::new(backend.clone()))
                    .expect("Failed to reopen in-memory store")
            }
            (None, Some(path)) => JsonStore::open(self.store.config().clone().path(path))
                .expect("Failed to reopen file store"),
            (None, None) => unreachable!("fixture has neither backend nor directory"),
        }
    }

    /// Returns the durable image decoded as JSON, or `Value::Null` if
    /// nothing has been written yet.
    pub fn durable(&self) -> Value {
        let bytes = match (&self.backend, self.path()) {
            (Some(backend), _) => backend.data(),
            (None, Some(path)) => read_if_exists(&path),
            (None, None) => None,
        };
        bytes.map_or(Value::Null, |data| {
            serde_json::from_slice(&data).expect("Durable image is not JSON")
        })
    }
}

fn read_if_exists(path: &Path) -> Option<Vec<u8>> {
    std::fs::read(path).ok()
}

impl std::ops::Deref for TestStore {
    type Target = JsonStore;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

impl std::ops::DerefMut for TestStore {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.store
    }
}

/// Runs a test with a temporary in-memory store.
///
/// # Example
///
/// ```rust
/// use kvstash_testkit::with_temp_store;
/// use kvstash_core::Storage;
/// use serde_json::json;
///
/// with_temp_store(|store| {
///     store.insert("key", json!("value")).unwrap();
/// });
/// ```
pub fn with_temp_store<F, R>(f: F) -> R
where
    F: FnOnce(&mut JsonStore) -> R,
{
    let mut test_store = TestStore::memory();
    f(&mut test_store.store)
}

/// Runs a test with a temporary file-based store.
pub fn with_file_store<F, R>(f: F) -> R
where
    F: FnOnce(&mut JsonStore, &Path) -> R,
{
    let mut test_store = TestStore::file();
    let path = test_store.path().expect("File store should have a path");
    f(&mut test_store.store, &path)
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;
    use serde_json::json;

    /// Creates a store holding `count` keys `key-0 .. key-{count-1}`, each
    /// mapped to its index.
    pub fn populated_store(count: usize) -> TestStore {
        let mut test_store = TestStore::memory();
        for i in 0..count {
            test_store
                .store
                .insert(&format!("key-{i}"), json!(i))
                .expect("Failed to populate store");
        }
        test_store
    }

    /// Creates a store holding the keys `apple`, `banana` and `grape`.
    pub fn fruit_store() -> TestStore {
        let mut test_store = TestStore::memory();
        for fruit in ["apple", "banana", "grape"] {
            test_store
                .store
                .insert(fruit, json!(fruit.len()))
                .expect("Failed to populate store");
        }
        test_store
    }
}
