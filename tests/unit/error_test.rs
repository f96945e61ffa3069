//! Tests for error types

use prometheus_task_queue::core::SchedulerError;

#[test]
fn test_invalid_capacity_error() {
    let err = SchedulerError::InvalidCapacity(0);
    assert_eq!(format!("{}", err), "invalid capacity 0: capacity must be greater than 0");
}

#[test]
fn test_config_error() {
    let err = SchedulerError::Config("bad".to_string());
    assert_eq!(format!("{}", err), "config error: bad");
}

#[test]
fn test_runtime_unavailable_error() {
    let err = SchedulerError::RuntimeUnavailable("no reactor".to_string());
    assert_eq!(format!("{}", err), "runtime unavailable: no reactor");
}

#[test]
fn test_task_abandoned_error() {
    let err = SchedulerError::TaskAbandoned(12);
    assert_eq!(format!("{}", err), "task 12 abandoned before admission");
}

#[test]
fn test_task_dropped_error() {
    let err = SchedulerError::TaskDropped(3);
    assert_eq!(format!("{}", err), "task 3 dropped by its runtime before completing");
}
