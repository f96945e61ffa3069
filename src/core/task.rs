//! Backlog entries and the caller-facing task handle.

use std::any::Any;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::FutureExt;
use tokio::sync::oneshot;

use crate::core::SchedulerError;
use crate::util::serde::{TaskAction, TaskId};

/// Payload of a panic caught at the task boundary.
type PanicPayload = Box<dyn Any + Send + 'static>;

/// What the one-shot cell carries back to the handle.
type Settled<T, E> = Result<Result<T, E>, PanicPayload>;

/// Boxed future that runs the work and fires the handle's continuation.
pub(crate) type TaskRun = Pin<Box<dyn Future<Output = TaskAction> + Send + 'static>>;

/// A submitted task waiting in the backlog.
///
/// The work is not started until the task is admitted. Dropping a pending task
/// drops its continuation, which leaves the handle unsettled for good.
pub(crate) struct PendingTask {
    pub id: TaskId,
    started: Arc<AtomicBool>,
    start: Box<dyn FnOnce() -> TaskRun + Send + 'static>,
}

impl PendingTask {
    /// Wrap `work` together with the sending half of a fresh one-shot cell.
    pub fn new<F, Fut, T, E>(id: TaskId, work: F) -> (Self, TaskHandle<T, E>)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        let (tx, rx) = oneshot::channel::<Settled<T, E>>();
        let start = move || -> TaskRun {
            Box::pin(async move {
                // `work()` runs inside the guarded future so a panic while
                // building the future is caught too.
                let settled = AssertUnwindSafe(async move { work().await })
                    .catch_unwind()
                    .await;
                let action = match &settled {
                    Ok(Ok(_)) => TaskAction::Succeed,
                    Ok(Err(_)) => TaskAction::Fail,
                    Err(_) => TaskAction::Panic,
                };
                // Receiver gone means the caller detached; nothing to deliver.
                let _ = tx.send(settled);
                action
            })
        };
        let started = Arc::new(AtomicBool::new(false));
        let pending = Self {
            id,
            started: Arc::clone(&started),
            start: Box::new(start),
        };
        (pending, TaskHandle::new(id, rx, started))
    }

    /// Consume the entry and produce the future that executes it.
    ///
    /// From here on a lost continuation means the run future was dropped,
    /// not that the task was cleared from the backlog.
    pub fn start(self) -> TaskRun {
        self.started.store(true, Ordering::Release);
        (self.start)()
    }
}

/// Caller-visible handle to a task's eventual outcome.
///
/// Awaiting the handle yields the work's `Result<T, E>` verbatim. If the work
/// panicked, the panic is resumed in the awaiting task.
///
/// # Abandoned tasks
///
/// A task still in the backlog when [`Scheduler::clear`] runs is discarded and
/// its handle never settles: awaiting it directly waits forever. Use
/// [`TaskHandle::outcome`] to observe abandonment as an error instead.
///
/// The same holds for an admitted task whose runtime drops it before it
/// finishes (for example a [`TokioSpawner`] bound to a runtime that has shut
/// down); `outcome` reports that case as `SchedulerError::TaskDropped`.
///
/// Dropping a handle does not cancel the task; the work still runs when
/// admitted and its result is discarded.
///
/// [`Scheduler::clear`]: crate::core::Scheduler::clear
/// [`TokioSpawner`]: crate::runtime::TokioSpawner
#[must_use = "dropping a handle detaches the task and discards its result"]
pub struct TaskHandle<T, E> {
    id: TaskId,
    rx: oneshot::Receiver<Settled<T, E>>,
    started: Arc<AtomicBool>,
    abandoned: bool,
}

impl<T, E> TaskHandle<T, E> {
    const fn new(
        id: TaskId,
        rx: oneshot::Receiver<Settled<T, E>>,
        started: Arc<AtomicBool>,
    ) -> Self {
        Self {
            id,
            rx,
            started,
            abandoned: false,
        }
    }

    /// Identifier assigned at submission.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Wait for the task, reporting abandonment instead of hanging.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::TaskAbandoned` if the task was discarded from
    /// the backlog by `clear` before it was admitted, and
    /// `SchedulerError::TaskDropped` if it was admitted but its runtime
    /// dropped it before it finished.
    pub async fn outcome(self) -> Result<Result<T, E>, SchedulerError> {
        if self.abandoned {
            return Err(self.lost());
        }
        let id = self.id;
        let started = Arc::clone(&self.started);
        match self.rx.await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(payload)) => panic::resume_unwind(payload),
            Err(_) if started.load(Ordering::Acquire) => Err(SchedulerError::TaskDropped(id)),
            Err(_) => Err(SchedulerError::TaskAbandoned(id)),
        }
    }

    fn lost(&self) -> SchedulerError {
        if self.started.load(Ordering::Acquire) {
            SchedulerError::TaskDropped(self.id)
        } else {
            SchedulerError::TaskAbandoned(self.id)
        }
    }
}

impl<T, E> Future for TaskHandle<T, E> {
    type Output = Result<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if this.abandoned {
            return Poll::Pending;
        }
        match Pin::new(&mut this.rx).poll(cx) {
            Poll::Ready(Ok(Ok(result))) => Poll::Ready(result),
            Poll::Ready(Ok(Err(payload))) => panic::resume_unwind(payload),
            Poll::Ready(Err(_)) => {
                // Sender dropped by `clear` or the runtime: stays pending forever.
                tracing::debug!(task_id = this.id, reason = %this.lost(), "awaited handle of lost task");
                this.abandoned = true;
                Poll::Pending
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T, E> std::fmt::Debug for TaskHandle<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskHandle")
            .field("id", &self.id)
            .field("abandoned", &self.abandoned)
            .finish_non_exhaustive()
    }
}
