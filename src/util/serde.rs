//! Serializable identifiers and lifecycle enums shared across modules.

use serde::{Deserialize, Serialize};

/// Identifier assigned to each submitted task, unique per scheduler.
pub type TaskId = u64;

/// Lifecycle transitions a task goes through, as reported to audit sinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskAction {
    /// Task was appended to the backlog.
    Submit,
    /// Task was admitted and its work started.
    Start,
    /// Work produced a value.
    Succeed,
    /// Work produced an error.
    Fail,
    /// Work panicked.
    Panic,
    /// Backlog was discarded by `clear`.
    Clear,
}

impl TaskAction {
    /// Stable lowercase name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::Start => "start",
            Self::Succeed => "succeed",
            Self::Fail => "fail",
            Self::Panic => "panic",
            Self::Clear => "clear",
        }
    }
}

impl std::fmt::Display for TaskAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
