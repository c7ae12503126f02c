//! Deferred-execution transactions.
//!
//! A transaction is a buffer of [`Operation`]s. Nothing in it touches the
//! store until commit, which:
//! - reloads durable state before every step,
//! - applies each step as a direct-mode write,
//! - records the inverse of every applied step in an [`UndoLog`],
//! - on the first failure, unwinds the undo log newest-first and drops the
//!   remaining buffered operations.
//!
//! Commit applies against the latest durable state at apply time, not a
//! snapshot taken at `begin`.

mod commit;
mod operation;
mod rollback;
mod state;
mod undo;

pub use operation::Operation;
pub use state::TransactionState;
pub use undo::RollbackReport;

pub(crate) use commit::replay;
pub(crate) use rollback::unwind;
pub(crate) use state::Transaction;
pub(crate) use undo::UndoLog;

use crate::error::CoreResult;
use crate::record::Value;

/// The durable target the commit and rollback engines drive.
pub(crate) trait OperationApplier {
    /// Replaces in-memory state with the latest durable state.
    fn reload(&mut self) -> CoreResult<()>;

    /// Returns the current value of `key`.
    fn current_value(&self, key: &str) -> CoreResult<Value>;

    /// Applies `operation` in direct mode: validate, mutate, persist.
    ///
    /// A failed apply must leave the target unchanged.
    fn apply(&mut self, operation: &Operation) -> CoreResult<()>;
}

#[cfg(test)]
pub(crate) mod testing {
    //! An in-memory applier with write-failure injection for engine tests.

    use super::{Operation, OperationApplier};
    use crate::error::{CoreError, CoreResult};
    use crate::record::Value;
    use kvstash_storage::StorageError;
    use serde_json::Map;
    use std::collections::HashSet;
    use std::io;

    #[derive(Debug, Default)]
    pub(crate) struct MapApplier {
        pub(crate) map: Map<String, Value>,
        pub(crate) broken_keys: HashSet<String>,
        pub(crate) reloads: usize,
        pub(crate) applied: Vec<Operation>,
    }

    impl MapApplier {
        pub(crate) fn with(pairs: &[(&str, Value)]) -> Self {
            Self {
                map: pairs
                    .iter()
                    .map(|(k, v)| ((*k).to_string(), v.clone()))
                    .collect(),
                ..Self::default()
            }
        }

        pub(crate) fn break_key(&mut self, key: &str) {
            self.broken_keys.insert(key.to_string());
        }
    }

    impl OperationApplier for MapApplier {
        fn reload(&mut self) -> CoreResult<()> {
            self.reloads += 1;
            Ok(())
        }

        fn current_value(&self, key: &str) -> CoreResult<Value> {
            self.map
                .get(key)
                .cloned()
                .ok_or_else(|| CoreError::key_not_found(key))
        }

        fn apply(&mut self, operation: &Operation) -> CoreResult<()> {
            operation.validate(&self.map)?;
            if self.broken_keys.contains(operation.key()) {
                return Err(StorageError::Io(io::Error::new(
                    io::ErrorKind::Other,
                    "simulated write failure",
                ))
                .into());
            }
            operation.apply_to(&mut self.map)?;
            self.applied.push(operation.clone());
            Ok(())
        }
    }
}
