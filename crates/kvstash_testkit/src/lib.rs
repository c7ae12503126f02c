//! # kvstash Testkit
//!
//! Test utilities for kvstash.
//!
//! This crate provides:
//! - Test fixtures for file-backed and in-memory stores
//! - A fault-injecting storage backend
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust
//! use kvstash_testkit::prelude::*;
//! use kvstash_core::Storage;
//! use serde_json::json;
//!
//! with_temp_store(|store| {
//!     store.insert("a", json!(1)).unwrap();
//!     assert!(store.exists("a"));
//! });
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod faulty;
pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::faulty::*;
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use faulty::*;
pub use fixtures::*;
pub use generators::*;
