//! Tests for utility functions

use prometheus_task_queue::util::{init_tracing, now_ms, TaskAction, TaskId};

#[test]
fn test_task_action_names() {
    assert_eq!(TaskAction::Submit.to_string(), "submit");
    assert_eq!(TaskAction::Succeed.as_str(), "succeed");
    assert_eq!(TaskAction::Clear.to_string(), "clear");
}

#[test]
fn test_task_action_serde() {
    let json = serde_json::to_string(&TaskAction::Panic).unwrap();
    assert_eq!(json, "\"panic\"");
    let back: TaskAction = serde_json::from_str("\"start\"").unwrap();
    assert_eq!(back, TaskAction::Start);
}

#[test]
fn test_now_ms_advances() {
    let a = now_ms();
    std::thread::sleep(std::time::Duration::from_millis(2));
    assert!(now_ms() > a);
}

#[test]
fn test_init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
}

#[test]
fn test_task_id() {
    let id: TaskId = 12345;
    assert_eq!(id, 12345);
}
