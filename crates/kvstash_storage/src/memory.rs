//! In-memory storage backend for testing.

use crate::backend::StorageBackend;
use crate::error::StorageResult;
use parking_lot::RwLock;
use std::sync::Arc;

/// An in-memory storage backend.
///
/// This backend keeps the image in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral stores that don't need persistence
///
/// Clones share the same image, the way two handles on one file would.
/// Tests use a retained clone to inspect or tamper with "durable" state
/// while a store owns the other handle.
///
/// # Example
///
/// ```rust
/// use kvstash_storage::{StorageBackend, InMemoryBackend};
///
/// let mut backend = InMemoryBackend::new();
/// let observer = backend.clone();
///
/// backend.replace(b"{}").unwrap();
/// assert_eq!(observer.data(), Some(b"{}".to_vec()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    image: Arc<RwLock<Option<Vec<u8>>>>,
}

impl InMemoryBackend {
    /// Creates a new empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory backend with a pre-existing image.
    ///
    /// Useful for testing load and recovery paths.
    #[must_use]
    pub fn with_data(data: Vec<u8>) -> Self {
        Self {
            image: Arc::new(RwLock::new(Some(data))),
        }
    }

    /// Returns a copy of the current image.
    #[must_use]
    pub fn data(&self) -> Option<Vec<u8>> {
        self.image.read().clone()
    }

    /// Overwrites the image behind every handle.
    pub fn set_data(&self, data: Vec<u8>) {
        *self.image.write() = Some(data);
    }
}

impl StorageBackend for InMemoryBackend {
    fn read_all(&self) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.image.read().clone())
    }

    fn replace(&mut self, data: &[u8]) -> StorageResult<()> {
        *self.image.write() = Some(data.to_vec());
        Ok(())
    }

    fn exists(&self) -> StorageResult<bool> {
        Ok(self.image.read().is_some())
    }
}
