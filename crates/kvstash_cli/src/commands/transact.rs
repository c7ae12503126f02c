//! Script-driven transactions.
//!
//! A script is a JSON array of operations:
//!
//! ```json
//! [
//!   {"op": "insert", "key": "key2", "value": "value"},
//!   {"op": "update", "key": "key2", "value": "new_value"},
//!   {"op": "delete", "key": "key"}
//! ]
//! ```
//!
//! All operations are buffered inside one transaction and committed
//! together. If a step fails, the steps before it are undone and the rest
//! are skipped.

use kvstash_core::{open_store, Config, CoreError, Operation, Storage, StoreKind};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Apply the operations in `script_path` as one transaction.
pub fn run(
    kind: StoreKind,
    config: &Config,
    script_path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    info!("Applying transaction script {:?}", script_path);

    let script = fs::read(script_path)?;
    let operations: Vec<Operation> = serde_json::from_slice(&script)?;

    let mut store = open_store(kind, config)?;
    let count = operations.len();
    apply(store.as_mut(), operations)?;

    println!("✓ Transaction committed");
    println!("  Operations: {count}");
    Ok(())
}

/// Buffers `operations` in a fresh transaction and commits them.
pub fn apply(store: &mut dyn Storage, operations: Vec<Operation>) -> Result<(), CoreError> {
    store.begin()?;
    for operation in operations {
        let buffered = match operation {
            Operation::Insert { key, value } => store.insert(&key, value).map(drop),
            Operation::Update { key, value } => store.update(&key, value).map(drop),
            Operation::Delete { key } => store.delete(&key),
        };
        if let Err(e) = buffered {
            if let Err(rollback_error) = store.rollback() {
                warn!("Could not close transaction: {rollback_error}");
            }
            return Err(e);
        }
    }

    match store.commit() {
        Ok(()) => Ok(()),
        Err(e) => {
            if let CoreError::TransactionAborted { report, .. } = &e {
                for failure in report.failures() {
                    warn!("Could not undo: {failure}");
                }
            }
            Err(e)
        }
    }
}
