//! Rollback engine: replays recorded inverses newest-first.

use crate::transaction::{OperationApplier, RollbackReport, UndoLog};
use tracing::{info, warn};

/// Applies every inverse in `undo`, newest first.
///
/// Each inverse is popped before it is attempted, so a step that keeps
/// failing is reported once and never retried; the sweep always finishes
/// after exactly as many attempts as there were recorded inverses.
pub(crate) fn unwind<A>(target: &mut A, mut undo: UndoLog) -> RollbackReport
where
    A: OperationApplier + ?Sized,
{
    let mut report = RollbackReport::default();
    let total = undo.len();

    while let Some(inverse) = undo.pop() {
        match target.apply(&inverse) {
            Ok(()) => report.record_undone(),
            Err(cause) => {
                warn!(undo = %inverse, error = %cause, "rollback step failed");
                report.record_failure(inverse, cause);
            }
        }
    }

    if total > 0 {
        info!(
            undone = report.undone(),
            failed = report.failed(),
            "rollback finished"
        );
    }

    report
}
