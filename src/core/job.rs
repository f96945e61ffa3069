//! Struct-shaped units of work.

use async_trait::async_trait;

/// A unit of work that can be submitted with [`Scheduler::submit_job`].
///
/// Closures cover most call sites; implement `Job` when the work carries its
/// own state and is easier to express as a type. The job is consumed when it
/// runs, so it is executed at most once.
///
/// # Example
///
/// ```rust,ignore
/// use async_trait::async_trait;
/// use prometheus_task_queue::core::Job;
///
/// struct Download {
///     url: String,
/// }
///
/// #[async_trait]
/// impl Job for Download {
///     type Output = Vec<u8>;
///     type Error = std::io::Error;
///
///     async fn run(self) -> Result<Vec<u8>, std::io::Error> {
///         fetch(&self.url).await
///     }
/// }
///
/// let bytes = scheduler.submit_job(Download { url }).await?;
/// ```
///
/// [`Scheduler::submit_job`]: crate::core::Scheduler::submit_job
#[async_trait]
pub trait Job: Send + 'static {
    /// Value produced on success.
    type Output: Send + 'static;
    /// Error produced on failure, delivered to the handle verbatim.
    type Error: Send + 'static;

    /// Execute the job.
    async fn run(self) -> Result<Self::Output, Self::Error>;
}
