//! Error types for scheduler operations.

use thiserror::Error;

use crate::util::serde::TaskId;

/// Errors produced by scheduler components.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Scheduler was configured with a capacity of zero.
    #[error("invalid capacity {0}: capacity must be greater than 0")]
    InvalidCapacity(usize),
    /// Configuration could not be parsed or failed validation.
    #[error("config error: {0}")]
    Config(String),
    /// No async runtime was available to execute tasks.
    #[error("runtime unavailable: {0}")]
    RuntimeUnavailable(String),
    /// Task was discarded from the backlog by `clear` and will never run.
    #[error("task {0} abandoned before admission")]
    TaskAbandoned(TaskId),
    /// Task was admitted but its runtime dropped it before it finished,
    /// typically because the runtime shut down.
    #[error("task {0} dropped by its runtime before completing")]
    TaskDropped(TaskId),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
