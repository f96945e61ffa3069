//! Tests for configuration validation

use std::io::Write;

use prometheus_task_queue::config::SchedulerConfig;
use prometheus_task_queue::core::DEFAULT_SCHEDULER_NAME;

#[test]
fn test_default_config_is_valid() {
    let config = SchedulerConfig::default();
    assert_eq!(config.name, DEFAULT_SCHEDULER_NAME);
    assert!(config.capacity >= 1);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_invalid_capacity() {
    let invalid = SchedulerConfig::with_capacity(0);
    assert!(invalid.validate().is_err());
}

#[test]
fn test_config_invalid_name() {
    let invalid = SchedulerConfig::with_capacity(2).with_name("");
    assert!(invalid.validate().is_err());
}

#[test]
fn test_config_from_json() {
    let json = r#"{
        "name": "uploads",
        "capacity": 6
    }"#;

    let config = SchedulerConfig::from_json_str(json).expect("config");
    assert_eq!(config.name, "uploads");
    assert_eq!(config.capacity, 6);
}

#[test]
fn test_config_from_json_fills_defaults() {
    let config = SchedulerConfig::from_json_str(r#"{ "capacity": 2 }"#).expect("config");
    assert_eq!(config.name, DEFAULT_SCHEDULER_NAME);
    assert_eq!(config.capacity, 2);
}

#[test]
fn test_config_from_json_rejects_zero_capacity() {
    let err = SchedulerConfig::from_json_str(r#"{ "capacity": 0 }"#).unwrap_err();
    assert_eq!(err.to_string(), "config error: capacity must be greater than 0");
}

#[test]
fn test_config_from_json_rejects_malformed() {
    assert!(SchedulerConfig::from_json_str("{ capacity: }").is_err());
}

#[test]
fn test_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    write!(file, r#"{{ "name": "disk", "capacity": 3 }}"#).expect("write");

    let config = SchedulerConfig::from_file(file.path()).expect("config");
    assert_eq!(config, SchedulerConfig::with_capacity(3).with_name("disk"));
}

#[test]
fn test_config_from_missing_file() {
    let err = SchedulerConfig::from_file("/nonexistent/task-queue.json").unwrap_err();
    assert!(err.to_string().contains("reading scheduler config"));
}
