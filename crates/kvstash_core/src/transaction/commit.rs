//! Commit engine: replays a transaction buffer against durable state.

use crate::error::{CoreError, CoreResult};
use crate::transaction::{unwind, Operation, OperationApplier, UndoLog};
use tracing::{debug, warn};

/// Applies `operations` in order, returning how many were applied.
///
/// Durable state is reloaded once up front and again before every step, so
/// each step sees whatever the backing store holds at that instant. The
/// inverse of every applied step is recorded; if step `i` fails, steps
/// `1..i` are undone newest-first, steps after `i` are dropped unapplied,
/// and [`CoreError::TransactionAborted`] carries the rollback report.
///
/// # Errors
///
/// Returns the reload error unchanged if the initial reload fails, since
/// nothing has been applied at that point.
pub(crate) fn replay<A>(target: &mut A, operations: Vec<Operation>) -> CoreResult<usize>
where
    A: OperationApplier + ?Sized,
{
    let total = operations.len();
    target.reload()?;

    let mut undo = UndoLog::with_capacity(total);
    for (index, operation) in operations.iter().enumerate() {
        let step = index + 1;
        match apply_step(target, operation) {
            Ok(inverse) => {
                debug!(step, op = %operation, "commit step applied");
                undo.push(inverse);
            }
            Err(cause) => {
                let discarded = total - step;
                warn!(
                    step,
                    op = %operation,
                    error = %cause,
                    discarded,
                    "commit step failed, rolling back"
                );
                let report = unwind(target, undo);
                return Err(CoreError::TransactionAborted {
                    step,
                    cause: Box::new(cause),
                    report,
                    discarded,
                });
            }
        }
    }

    Ok(total)
}

/// Applies one buffered operation and returns its inverse.
fn apply_step<A>(target: &mut A, operation: &Operation) -> CoreResult<Operation>
where
    A: OperationApplier + ?Sized,
{
    target.reload()?;

    let inverse = match operation {
        Operation::Insert { key, .. } => Operation::delete(key.as_str()),
        Operation::Update { key, .. } => {
            Operation::update(key.as_str(), target.current_value(key)?)
        }
        Operation::Delete { key } => Operation::insert(key.as_str(), target.current_value(key)?),
    };

    target.apply(operation)?;
    Ok(inverse)
}
