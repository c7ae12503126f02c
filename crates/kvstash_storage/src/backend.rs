//! Storage backend trait definition.

use crate::error::StorageResult;

/// A whole-image storage backend for kvstash.
///
/// Storage backends are **opaque byte stores** holding exactly one image.
/// kvstash owns the interpretation of that image; backends only move it
/// between memory and durable storage.
///
/// # Invariants
///
/// - `read_all` returns exactly the bytes of the last successful `replace`
/// - `replace` is all-or-nothing: a failed call leaves the previous image
///   readable and intact
/// - No handle outlives a single call
///
/// # Implementors
///
/// - [`super::InMemoryBackend`] - For testing
/// - [`super::FileBackend`] - For persistent storage
pub trait StorageBackend: Send + Sync {
    /// Reads the complete stored image.
    ///
    /// Returns `None` if nothing has ever been stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the image exists but cannot be read.
    fn read_all(&self) -> StorageResult<Option<Vec<u8>>>;

    /// Replaces the stored image with `data`.
    ///
    /// After this returns successfully, a subsequent `read_all` (from this
    /// or any other handle on the same storage) observes `data`.
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be written. The previous image
    /// is left in place.
    fn replace(&mut self, data: &[u8]) -> StorageResult<()>;

    /// Returns whether an image has been stored.
    ///
    /// # Errors
    ///
    /// Returns an error if existence cannot be determined.
    fn exists(&self) -> StorageResult<bool>;
}
