//! Fault injection for storage backends.
//!
//! [`FaultyBackend`] wraps any backend and fails reads or writes on demand.
//! The store takes ownership of the backend, so faults are armed through a
//! [`FaultHandle`] obtained before handing the backend over.
//!
//! ## Usage
//!
//! ```rust
//! use kvstash_testkit::FaultyBackend;
//! use kvstash_storage::{InMemoryBackend, StorageBackend};
//!
//! let mut backend = FaultyBackend::new(Box::new(InMemoryBackend::new()));
//! let faults = backend.handle();
//!
//! faults.fail_writes_after(1);
//! assert!(backend.replace(b"{}").is_ok());
//! assert!(backend.replace(b"{}").is_err());
//! ```

use kvstash_storage::{StorageBackend, StorageError, StorageResult};
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug)]
struct FaultState {
    /// Writes numbered above this fail.
    fail_after: AtomicUsize,
    /// Only this write number fails.
    fail_once_at: AtomicUsize,
    fail_reads: AtomicBool,
    writes: AtomicUsize,
    failed_writes: AtomicUsize,
}

impl Default for FaultState {
    fn default() -> Self {
        Self {
            fail_after: AtomicUsize::new(usize::MAX),
            fail_once_at: AtomicUsize::new(usize::MAX),
            fail_reads: AtomicBool::new(false),
            writes: AtomicUsize::new(0),
            failed_writes: AtomicUsize::new(0),
        }
    }
}

/// Controls the faults of a [`FaultyBackend`] after it has been moved.
///
/// Write numbers count every `replace` attempt, starting at 1, from the
/// moment the backend was created or last [`reset`](FaultHandle::reset).
#[derive(Debug, Clone)]
pub struct FaultHandle {
    state: Arc<FaultState>,
}

impl FaultHandle {
    /// Lets the next `count` writes through, then fails every write.
    pub fn fail_writes_after(&self, count: usize) {
        let seen = self.state.writes.load(Ordering::SeqCst);
        self.state
            .fail_after
            .store(seen.saturating_add(count), Ordering::SeqCst);
    }

    /// Fails every write from now on.
    pub fn fail_all_writes(&self) {
        self.fail_writes_after(0);
    }

    /// Fails only the `nth` write from now (1-based).
    pub fn fail_nth_write(&self, nth: usize) {
        let seen = self.state.writes.load(Ordering::SeqCst);
        self.state
            .fail_once_at
            .store(seen.saturating_add(nth), Ordering::SeqCst);
    }

    /// Sets whether reads fail.
    pub fn set_fail_reads(&self, fail: bool) {
        self.state.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Clears every armed fault and the counters.
    pub fn reset(&self) {
        self.state.fail_after.store(usize::MAX, Ordering::SeqCst);
        self.state.fail_once_at.store(usize::MAX, Ordering::SeqCst);
        self.state.fail_reads.store(false, Ordering::SeqCst);
        self.state.writes.store(0, Ordering::SeqCst);
        self.state.failed_writes.store(0, Ordering::SeqCst);
    }

    /// Returns the number of write attempts, failed ones included.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.state.writes.load(Ordering::SeqCst)
    }

    /// Returns the number of writes that were failed.
    #[must_use]
    pub fn failed_writes(&self) -> usize {
        self.state.failed_writes.load(Ordering::SeqCst)
    }
}

/// A storage backend wrapper that fails on command.
pub struct FaultyBackend {
    inner: Box<dyn StorageBackend>,
    state: Arc<FaultState>,
}

impl FaultyBackend {
    /// Wraps `inner` with no faults armed.
    pub fn new(inner: Box<dyn StorageBackend>) -> Self {
        Self {
            inner,
            state: Arc::new(FaultState::default()),
        }
    }

    /// Returns a handle for arming faults.
    #[must_use]
    pub fn handle(&self) -> FaultHandle {
        FaultHandle {
            state: Arc::clone(&self.state),
        }
    }
}

fn simulated(message: &str) -> StorageError {
    StorageError::Io(io::Error::new(io::ErrorKind::Other, message.to_string()))
}

impl StorageBackend for FaultyBackend {
    fn read_all(&self) -> StorageResult<Option<Vec<u8>>> {
        if self.state.fail_reads.load(Ordering::SeqCst) {
            return Err(simulated("simulated read failure"));
        }
        self.inner.read_all()
    }

    fn replace(&mut self, data: &[u8]) -> StorageResult<()> {
        let nth = self.state.writes.fetch_add(1, Ordering::SeqCst) + 1;
        let fail_after = self.state.fail_after.load(Ordering::SeqCst);
        let fail_once_at = self.state.fail_once_at.load(Ordering::SeqCst);

        if nth > fail_after || nth == fail_once_at {
            self.state.failed_writes.fetch_add(1, Ordering::SeqCst);
            return Err(simulated("simulated write failure"));
        }

        self.inner.replace(data)
    }

    fn exists(&self) -> StorageResult<bool> {
        self.inner.exists()
    }
}
