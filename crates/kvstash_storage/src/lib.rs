//! # kvstash Storage
//!
//! Storage backend trait and implementations for kvstash.
//!
//! Backends are **opaque whole-file byte stores**: a backend hands back the
//! complete persisted image, or replaces it with a new one. They never
//! interpret the bytes and never patch an image in place.
//!
//! ## Design Principles
//!
//! - One image per backend, always read and written in full
//! - A replacement is either fully visible or not visible at all
//! - No knowledge of the JSON document kvstash keeps inside the image
//! - Must be `Send + Sync`
//!
//! ## Available Backends
//!
//! - [`InMemoryBackend`] - For testing and ephemeral stores
//! - [`FileBackend`] - For persistent storage using OS file APIs
//!
//! ## Example
//!
//! ```rust
//! use kvstash_storage::{StorageBackend, InMemoryBackend};
//!
//! let mut backend = InMemoryBackend::new();
//! assert!(backend.read_all().unwrap().is_none());
//!
//! backend.replace(b"{\"key\":\"value\"}").unwrap();
//! assert_eq!(backend.read_all().unwrap().unwrap(), b"{\"key\":\"value\"}");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;

pub use backend::StorageBackend;
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use memory::InMemoryBackend;
