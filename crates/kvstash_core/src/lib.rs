//! # kvstash Core
//!
//! Core engine for kvstash, an embedded key-value store persisted as a
//! single JSON document.
//!
//! This crate provides:
//! - The [`Storage`] capability every store implements
//! - [`JsonStore`], a file-backed store with deferred-execution transactions
//! - [`MemoryStore`], a plain in-memory baseline without persistence
//! - A factory ([`StoreKind`], [`open_store`]) choosing between them by name
//!
//! ## Transactions
//!
//! While a transaction is open, mutations are buffered instead of applied.
//! `commit` replays the buffer in order against the latest durable state,
//! recording an inverse for every step it applies. If a step fails, the
//! recorded inverses are replayed newest-first and the rest of the buffer
//! is dropped.
//!
//! ```rust
//! use kvstash_core::{JsonStore, Config, Storage};
//! use kvstash_storage::InMemoryBackend;
//! use serde_json::json;
//!
//! let mut store = JsonStore::open_with_backend(
//!     Config::default(),
//!     Box::new(InMemoryBackend::new()),
//! ).unwrap();
//!
//! store.begin().unwrap();
//! store.insert("a", json!(1)).unwrap();
//! assert!(!store.exists("a"));
//!
//! store.commit().unwrap();
//! assert_eq!(store.select("a").unwrap(), json!(1));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod factory;
mod memory;
mod record;
mod storage;
mod store;
mod transaction;

pub use config::{Config, DEFAULT_STORE_FILE};
pub use error::{CoreError, CoreResult};
pub use factory::{open_store, StoreKind};
pub use memory::MemoryStore;
pub use record::{Record, Value};
pub use storage::Storage;
pub use store::JsonStore;
pub use transaction::{Operation, RollbackReport, TransactionState};

/// Version of the kvstash core crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
