//! Bounded-concurrency scheduler and the spawn abstraction it runs on.

use std::collections::VecDeque;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, trace, warn};

use super::audit::{build_audit_event, AuditSink};
use super::job::Job;
use super::stats::{SchedulerCounters, SchedulerStats};
use super::task::{PendingTask, TaskHandle};
use super::SchedulerError;
use crate::runtime::TokioSpawner;
use crate::util::serde::{TaskAction, TaskId};

/// Name given to schedulers built without an explicit one.
pub const DEFAULT_SCHEDULER_NAME: &str = "default";

/// Abstraction for spawning task execution on a runtime.
pub trait Spawn {
    /// Spawn a detached future.
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static;
}

/// Bookkeeping guarded by the scheduler mutex.
struct SchedulerState {
    /// Tasks admitted in the current epoch that have not finished yet.
    running: usize,
    /// Bumped by `clear`; completions from older epochs leave `running` alone.
    epoch: u64,
    backlog: VecDeque<PendingTask>,
}

/// State shared between scheduler clones and in-flight task futures.
struct Shared {
    name: String,
    capacity: usize,
    state: Mutex<SchedulerState>,
    counters: SchedulerCounters,
    next_task_id: AtomicU64,
    audit: Option<Arc<dyn AuditSink>>,
}

impl Shared {
    /// Hand an event to the audit sink. A panicking sink loses the event but
    /// never unwinds into admission or slot bookkeeping.
    fn record(&self, task_id: Option<TaskId>, action: TaskAction, detail: Option<String>) {
        let Some(sink) = &self.audit else {
            return;
        };
        let event = build_audit_event(self.name.as_str(), task_id, action, detail);
        if panic::catch_unwind(AssertUnwindSafe(|| sink.record(event))).is_err() {
            warn!(scheduler = %self.name, ?task_id, %action, "audit sink panicked; event dropped");
        }
    }
}

/// Capacity slot held by an admitted task.
///
/// Released explicitly once the task finishes, or on drop if the runtime
/// discards the task future first.
struct Slot {
    shared: Arc<Shared>,
    task_id: TaskId,
    epoch: u64,
    held: bool,
}

impl Slot {
    fn release(&mut self) {
        if !std::mem::take(&mut self.held) {
            return;
        }
        let mut state = self.shared.state.lock();
        if state.epoch == self.epoch {
            debug_assert!(state.running > 0, "running count underflow");
            state.running = state.running.saturating_sub(1);
        } else {
            trace!(task_id = self.task_id, "completion from a cleared epoch");
        }
    }
}

impl Drop for Slot {
    fn drop(&mut self) {
        if self.held {
            warn!(
                scheduler = %self.shared.name,
                task_id = self.task_id,
                "task dropped by its runtime before completing; releasing slot"
            );
            self.release();
        }
    }
}

/// Queue that runs at most `capacity` submitted tasks at a time.
///
/// Submitted work waits in a FIFO backlog and is admitted as soon as a slot is
/// free. Every completion, successful or not, releases its slot and admits the
/// next backlogged task, so the backlog drains without any polling.
///
/// Cloning is cheap; all clones drive the same backlog.
///
/// ```rust,ignore
/// use prometheus_task_queue::core::Scheduler;
///
/// let scheduler = Scheduler::new(2)?;
/// let a = scheduler.submit(|| async { Ok::<_, std::io::Error>("a") });
/// let b = scheduler.submit(|| async { Ok::<_, std::io::Error>("b") });
/// assert_eq!(a.await?, "a");
/// assert_eq!(b.await?, "b");
/// ```
pub struct Scheduler<S = TokioSpawner> {
    shared: Arc<Shared>,
    spawner: S,
}

impl<S: Clone> Clone for Scheduler<S> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            spawner: self.spawner.clone(),
        }
    }
}

impl Scheduler<TokioSpawner> {
    /// Create a scheduler that spawns work on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::InvalidCapacity` if `capacity` is zero and
    /// `SchedulerError::RuntimeUnavailable` when called outside a runtime.
    pub fn new(capacity: usize) -> Result<Self, SchedulerError> {
        Self::with_spawner(capacity, TokioSpawner::current()?)
    }
}

impl<S> Scheduler<S>
where
    S: Spawn + Clone + Send + Sync + 'static,
{
    /// Create a scheduler on a custom spawner.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::InvalidCapacity` if `capacity` is zero.
    pub fn with_spawner(capacity: usize, spawner: S) -> Result<Self, SchedulerError> {
        Self::from_parts(DEFAULT_SCHEDULER_NAME.to_string(), capacity, spawner, None)
    }

    pub(crate) fn from_parts(
        name: String,
        capacity: usize,
        spawner: S,
        audit: Option<Arc<dyn AuditSink>>,
    ) -> Result<Self, SchedulerError> {
        if capacity == 0 {
            return Err(SchedulerError::InvalidCapacity(capacity));
        }
        info!(scheduler = %name, capacity, "scheduler initialized");
        Ok(Self {
            shared: Arc::new(Shared {
                name,
                capacity,
                state: Mutex::new(SchedulerState {
                    running: 0,
                    epoch: 0,
                    backlog: VecDeque::new(),
                }),
                counters: SchedulerCounters::default(),
                next_task_id: AtomicU64::new(0),
                audit,
            }),
            spawner,
        })
    }

    /// Submit a unit of work.
    ///
    /// The work is appended to the backlog and admitted right away if a slot
    /// is free. This never blocks; only awaiting the returned handle does.
    /// Work may submit further work to the same scheduler.
    pub fn submit<F, Fut, T, E>(&self, work: F) -> TaskHandle<T, E>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        let id = self.shared.next_task_id.fetch_add(1, Ordering::Relaxed);
        let (pending, handle) = PendingTask::new(id, work);
        self.shared.counters.submitted.fetch_add(1, Ordering::Relaxed);
        self.shared.record(Some(id), TaskAction::Submit, None);

        let backlog = {
            let mut state = self.shared.state.lock();
            state.backlog.push_back(pending);
            state.backlog.len()
        };
        debug!(scheduler = %self.shared.name, task_id = id, backlog, "task submitted");

        Self::try_admit(&self.shared, &self.spawner);
        handle
    }

    /// Submit a [`Job`].
    pub fn submit_job<J: Job>(&self, job: J) -> TaskHandle<J::Output, J::Error> {
        self.submit(move || job.run())
    }

    /// Discard the backlog and reset the running count to zero.
    ///
    /// Returns the number of discarded tasks. Their handles never settle:
    /// awaiting one waits forever (see [`TaskHandle::outcome`] for a way to
    /// observe this). Tasks already running are neither cancelled nor awaited;
    /// they finish normally and settle their handles, but no longer count
    /// against capacity, so for a while they may run alongside up to
    /// `capacity` newly admitted tasks.
    pub fn clear(&self) -> usize {
        let (discarded, in_flight) = {
            let mut state = self.shared.state.lock();
            let in_flight = state.running;
            state.running = 0;
            state.epoch += 1;
            (std::mem::take(&mut state.backlog), in_flight)
        };
        let count = discarded.len();
        // Dropped outside the lock: user closures may touch the scheduler on drop.
        drop(discarded);

        self.shared
            .counters
            .abandoned
            .fetch_add(count as u64, Ordering::Relaxed);
        self.shared.record(
            None,
            TaskAction::Clear,
            Some(format!("abandoned={count} detached={in_flight}")),
        );
        if count > 0 {
            warn!(
                scheduler = %self.shared.name,
                abandoned = count,
                detached = in_flight,
                "backlog cleared; abandoned handles will never settle"
            );
        } else {
            info!(scheduler = %self.shared.name, detached = in_flight, "backlog cleared");
        }
        count
    }

    /// Admit backlogged tasks until capacity is saturated or the backlog is
    /// empty. A no-op in either of those states.
    fn try_admit(shared: &Arc<Shared>, spawner: &S) {
        loop {
            let (task, epoch, running) = {
                let mut state = shared.state.lock();
                if state.running >= shared.capacity {
                    trace!(scheduler = %shared.name, "capacity saturated");
                    return;
                }
                let Some(task) = state.backlog.pop_front() else {
                    trace!(scheduler = %shared.name, "backlog empty");
                    return;
                };
                state.running += 1;
                (task, state.epoch, state.running)
            };

            debug!(scheduler = %shared.name, task_id = task.id, running, "task admitted");
            shared.record(Some(task.id), TaskAction::Start, None);
            Self::spawn_task(shared, spawner, task, epoch);
        }
    }

    /// Run an admitted task, then release its slot and cascade admission.
    ///
    /// A future dropped unpolled or mid-run still gives its slot back, but
    /// does not cascade: the next submission or completion admits instead.
    fn spawn_task(shared: &Arc<Shared>, spawner: &S, task: PendingTask, epoch: u64) {
        let next_spawner = spawner.clone();
        let task_id = task.id;
        let run = task.start();
        let slot = Slot {
            shared: Arc::clone(shared),
            task_id,
            epoch,
            held: true,
        };

        spawner.spawn(async move {
            let mut slot = slot;
            let action = run.await;
            let shared = Arc::clone(&slot.shared);

            let counter = match action {
                TaskAction::Fail => &shared.counters.failed,
                TaskAction::Panic => &shared.counters.panicked,
                _ => &shared.counters.succeeded,
            };
            counter.fetch_add(1, Ordering::Relaxed);
            shared.record(Some(task_id), action, None);
            slot.release();

            match action {
                TaskAction::Panic => warn!(scheduler = %shared.name, task_id, "task panicked"),
                _ => debug!(scheduler = %shared.name, task_id, outcome = %action, "task finished"),
            }

            Self::try_admit(&shared, &next_spawner);
        });
    }
}

impl<S> Scheduler<S> {
    /// Scheduler name used in logs and audit events.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Maximum number of concurrently running tasks.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.shared.capacity
    }

    /// Tasks currently counted as running.
    #[must_use]
    pub fn running(&self) -> usize {
        self.shared.state.lock().running
    }

    /// Tasks waiting for admission.
    #[must_use]
    pub fn backlog_len(&self) -> usize {
        self.shared.state.lock().backlog.len()
    }

    /// True when nothing is running and nothing is waiting.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        let state = self.shared.state.lock();
        state.running == 0 && state.backlog.is_empty()
    }

    /// Snapshot of gauges and lifetime counters.
    #[must_use]
    pub fn stats(&self) -> SchedulerStats {
        let (running, backlog) = {
            let state = self.shared.state.lock();
            (state.running, state.backlog.len())
        };
        self.shared
            .counters
            .snapshot(self.shared.capacity, running, backlog)
    }
}

impl<S> std::fmt::Debug for Scheduler<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("name", &self.shared.name)
            .field("capacity", &self.shared.capacity)
            .finish_non_exhaustive()
    }
}
