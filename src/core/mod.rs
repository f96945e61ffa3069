//! Core scheduling abstractions and capacity accounting.

pub mod audit;
pub mod error;
pub mod job;
pub mod scheduler;
pub mod stats;
pub mod task;

pub use audit::{build_audit_event, AuditEvent, AuditSink, InMemoryAuditSink};
pub use error::{AppResult, SchedulerError};
pub use job::Job;
pub use scheduler::{Scheduler, Spawn, DEFAULT_SCHEDULER_NAME};
pub use stats::SchedulerStats;
pub use task::TaskHandle;
