//! # Prometheus Task Queue
//!
//! A bounded-concurrency task queue: submit asynchronous work, run at most
//! `capacity` units of it at a time, and get each unit's result back through
//! its own handle.
//!
//! ## How it works
//!
//! - **Backlog**: submitted work waits in strict FIFO order.
//! - **Admission**: a task is admitted whenever a slot is free; the
//!   check-and-increment of the running count happens under one lock.
//! - **Cascade**: every completion, success or failure, releases its slot and
//!   admits the next backlogged task. No polling is involved.
//! - **Handles**: each submission returns a [`TaskHandle`](crate::core::TaskHandle)
//!   that resolves to the work's `Result<T, E>` exactly once.
//! - **Clear**: [`Scheduler::clear`](crate::core::Scheduler::clear) drops the backlog
//!   and resets the running count. Handles of dropped tasks never settle.
//!
//! ```rust,ignore
//! use prometheus_task_queue::core::Scheduler;
//! use std::time::Duration;
//!
//! let scheduler = Scheduler::new(2)?;
//!
//! let handles: Vec<_> = ["a", "b", "c"]
//!     .into_iter()
//!     .map(|label| {
//!         scheduler.submit(move || async move {
//!             tokio::time::sleep(Duration::from_millis(100)).await;
//!             Ok::<_, std::io::Error>(label)
//!         })
//!     })
//!     .collect();
//!
//! // "a" and "b" run immediately, "c" once either finishes.
//! for handle in handles {
//!     println!("{}", handle.await?);
//! }
//! ```
//!
//! For complete examples, see `tests/scheduler_test.rs`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core scheduling abstractions and capacity accounting.
pub mod core;
/// Configuration models for schedulers.
pub mod config;
/// Builders to construct schedulers from configuration.
pub mod builders;
/// Runtime adapters that execute admitted work.
pub mod runtime;
/// Shared utilities.
pub mod util;
