//! Scheduler statistics.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Point-in-time view of a scheduler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerStats {
    /// Maximum number of concurrently running tasks.
    pub capacity: usize,
    /// Tasks currently counted as running.
    pub running: usize,
    /// Tasks waiting in the backlog.
    pub backlog: usize,
    /// Total tasks submitted.
    pub submitted: u64,
    /// Total tasks whose work produced a value.
    pub succeeded: u64,
    /// Total tasks whose work produced an error.
    pub failed: u64,
    /// Total tasks whose work panicked.
    pub panicked: u64,
    /// Total backlog entries discarded by `clear`.
    pub abandoned: u64,
}

impl SchedulerStats {
    /// Tasks that reached a terminal state.
    #[must_use]
    pub const fn settled(&self) -> u64 {
        self.succeeded + self.failed + self.panicked
    }
}

/// Lifetime counters (lock-free atomics).
#[derive(Debug, Default)]
pub(crate) struct SchedulerCounters {
    pub submitted: AtomicU64,
    pub succeeded: AtomicU64,
    pub failed: AtomicU64,
    pub panicked: AtomicU64,
    pub abandoned: AtomicU64,
}

impl SchedulerCounters {
    /// Combine the counters with the live gauges into a snapshot.
    pub fn snapshot(&self, capacity: usize, running: usize, backlog: usize) -> SchedulerStats {
        SchedulerStats {
            capacity,
            running,
            backlog,
            submitted: self.submitted.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            panicked: self.panicked.load(Ordering::Relaxed),
            abandoned: self.abandoned.load(Ordering::Relaxed),
        }
    }
}
