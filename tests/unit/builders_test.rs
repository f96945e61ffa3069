//! Tests for builder modules

use prometheus_task_queue::builders::{build_schedulers, SchedulerBuilder};
use prometheus_task_queue::config::SchedulerConfig;
use prometheus_task_queue::core::{SchedulerError, DEFAULT_SCHEDULER_NAME};
use prometheus_task_queue::runtime::TokioSpawner;

#[test]
fn test_scheduler_builder_defaults() {
    let builder = SchedulerBuilder::new(4);
    assert_eq!(builder.config().name, DEFAULT_SCHEDULER_NAME);
    assert_eq!(builder.config().capacity, 4);
}

#[tokio::test]
async fn test_scheduler_builder_from_config() {
    let config = SchedulerConfig::with_capacity(3).with_name("thumbnails");
    let scheduler = SchedulerBuilder::from_config(&config).build().expect("scheduler");

    assert_eq!(scheduler.name(), "thumbnails");
    assert_eq!(scheduler.capacity(), 3);
    assert!(scheduler.is_idle());
}

#[tokio::test]
async fn test_scheduler_builder_rejects_zero_capacity() {
    let err = SchedulerBuilder::new(0).build().unwrap_err();
    assert!(matches!(err, SchedulerError::InvalidCapacity(0)));
}

#[tokio::test]
async fn test_scheduler_builder_rejects_blank_name() {
    let err = SchedulerBuilder::new(1).name("  ").build().unwrap_err();
    assert!(matches!(err, SchedulerError::Config(_)));
}

#[tokio::test]
async fn test_build_schedulers() {
    let spawner = TokioSpawner::current().expect("runtime");
    let configs = vec![
        SchedulerConfig::with_capacity(1).with_name("io"),
        SchedulerConfig::with_capacity(8).with_name("cpu"),
    ];

    let schedulers = build_schedulers(&configs, &spawner).expect("schedulers");
    assert_eq!(schedulers.len(), 2);
    assert_eq!(schedulers["io"].capacity(), 1);
    assert_eq!(schedulers["cpu"].capacity(), 8);
}

#[tokio::test]
async fn test_build_schedulers_rejects_duplicates() {
    let spawner = TokioSpawner::current().expect("runtime");
    let configs = vec![
        SchedulerConfig::with_capacity(1).with_name("io"),
        SchedulerConfig::with_capacity(2).with_name("io"),
    ];

    let err = build_schedulers(&configs, &spawner).unwrap_err();
    assert_eq!(err.to_string(), "config error: duplicate scheduler name `io`");
}
