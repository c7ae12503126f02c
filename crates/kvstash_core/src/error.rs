//! Error types for kvstash core.

use crate::transaction::{Operation, RollbackReport};
use std::path::PathBuf;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in kvstash core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage backend error while reading or writing the store image.
    #[error("persistence failure: {0}")]
    Persistence(#[from] kvstash_storage::StorageError),

    /// JSON encoding or decoding error.
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// Insert on a key that is already present.
    #[error("key already exists: {key}")]
    KeyAlreadyExists {
        /// The conflicting key.
        key: String,
    },

    /// Select, update or delete on a key that is absent.
    #[error("key not found: {key}")]
    KeyNotFound {
        /// The missing key.
        key: String,
    },

    /// `begin` while a transaction is already open.
    #[error("a transaction is already open")]
    TransactionAlreadyOpen,

    /// `commit` or `rollback` without an open transaction.
    #[error("no transaction is open")]
    NoActiveTransaction,

    /// The store does not support transactions.
    #[error("{store} does not support transactions")]
    TransactionsUnsupported {
        /// Name of the store kind.
        store: &'static str,
    },

    /// A commit step failed; the steps before it were rolled back.
    #[error("transaction aborted at step {step}: {cause}")]
    TransactionAborted {
        /// One-based index of the failing buffered operation.
        step: usize,
        /// Why the step failed.
        #[source]
        cause: Box<CoreError>,
        /// Outcome of undoing the steps applied before `step`.
        report: RollbackReport,
        /// Buffered operations after `step` that were never applied.
        discarded: usize,
    },

    /// A single undo step could not be applied during rollback.
    #[error("rollback step {undo} failed: {cause}")]
    RollbackStepFailed {
        /// The inverse operation that could not be applied.
        undo: Operation,
        /// Why it failed.
        #[source]
        cause: Box<CoreError>,
    },

    /// The persisted image is not a JSON object.
    #[error("invalid store format: {message}")]
    InvalidFormat {
        /// Description of the format issue.
        message: String,
    },

    /// The key pattern is not a valid regular expression.
    #[error("invalid key pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// The store file is missing and creation was disabled.
    #[error("store not found: {}", path.display())]
    StoreNotFound {
        /// Path that was expected to hold the store.
        path: PathBuf,
    },

    /// The factory was asked for a store kind it does not know.
    #[error("unknown store kind: {name}")]
    UnknownStoreKind {
        /// The requested name.
        name: String,
    },
}

impl CoreError {
    /// Creates a key already exists error.
    pub fn key_already_exists(key: impl Into<String>) -> Self {
        Self::KeyAlreadyExists { key: key.into() }
    }

    /// Creates a key not found error.
    pub fn key_not_found(key: impl Into<String>) -> Self {
        Self::KeyNotFound { key: key.into() }
    }

    /// Creates an invalid format error.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    /// Creates a rollback step failure for `undo`.
    pub fn rollback_step_failed(undo: Operation, cause: CoreError) -> Self {
        Self::RollbackStepFailed {
            undo,
            cause: Box::new(cause),
        }
    }
}
