//! Undo log and rollback reporting.

use crate::error::CoreError;
use crate::transaction::Operation;

/// Inverses of the steps a commit has applied so far, oldest first.
#[derive(Debug, Default)]
pub(crate) struct UndoLog {
    entries: Vec<Operation>,
}

impl UndoLog {
    /// Creates an empty undo log sized for `capacity` steps.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Records the inverse of a step that was just applied.
    pub(crate) fn push(&mut self, inverse: Operation) {
        self.entries.push(inverse);
    }

    /// Removes and returns the most recently recorded inverse.
    pub(crate) fn pop(&mut self) -> Option<Operation> {
        self.entries.pop()
    }

    /// Returns the number of recorded inverses.
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Outcome of a rollback sweep.
///
/// Every recorded inverse is attempted exactly once. Inverses that could not
/// be applied are kept here as [`CoreError::RollbackStepFailed`] entries, in
/// the order they were attempted (newest step first).
#[derive(Debug, Default)]
pub struct RollbackReport {
    undone: usize,
    failures: Vec<CoreError>,
}

impl RollbackReport {
    pub(crate) fn record_undone(&mut self) {
        self.undone += 1;
    }

    pub(crate) fn record_failure(&mut self, undo: Operation, cause: CoreError) {
        self.failures
            .push(CoreError::rollback_step_failed(undo, cause));
    }

    /// Returns true if every inverse was applied.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Returns the number of inverses applied successfully.
    #[must_use]
    pub fn undone(&self) -> usize {
        self.undone
    }

    /// Returns the number of inverses that could not be applied.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Returns the failures, each a [`CoreError::RollbackStepFailed`].
    #[must_use]
    pub fn failures(&self) -> &[CoreError] {
        &self.failures
    }

    /// Returns the inverse operations that could not be applied.
    pub fn failed_undos(&self) -> impl Iterator<Item = &Operation> {
        self.failures.iter().filter_map(|failure| match failure {
            CoreError::RollbackStepFailed { undo, .. } => Some(undo),
            _ => None,
        })
    }
}
