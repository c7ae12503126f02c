//! Transaction state.

use crate::transaction::Operation;

/// Whether a store is buffering writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    /// No transaction; writes are applied and persisted immediately.
    Closed,
    /// A transaction is open; writes are buffered until commit.
    Open,
}

/// An open transaction: the ordered buffer of pending operations.
#[derive(Debug, Default)]
pub(crate) struct Transaction {
    pending: Vec<Operation>,
}

impl Transaction {
    /// Creates an empty transaction.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Buffers an operation after all previously buffered ones.
    pub(crate) fn push(&mut self, operation: Operation) {
        self.pending.push(operation);
    }

    /// Returns the buffered operations in commit order.
    pub(crate) fn pending(&self) -> &[Operation] {
        &self.pending
    }

    /// Returns the number of buffered operations.
    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }

    /// Consumes the transaction, yielding its operations in commit order.
    pub(crate) fn into_operations(self) -> Vec<Operation> {
        self.pending
    }
}
