//! Tests for audit sink

use prometheus_task_queue::core::{build_audit_event, AuditSink, InMemoryAuditSink};
use prometheus_task_queue::util::TaskAction;

#[test]
fn test_in_memory_audit_sink() {
    let sink = InMemoryAuditSink::new(10);

    sink.record(build_audit_event(
        "default",
        Some(1),
        TaskAction::Submit,
        Some("payload".to_string()),
    ));
    assert_eq!(sink.events().len(), 1);

    let events = sink.events();
    assert_eq!(events[0].task_id, Some(1));
    assert_eq!(events[0].action, TaskAction::Submit);
    assert_eq!(events[0].detail.as_deref(), Some("payload"));
}

#[test]
fn test_audit_sink_overflow() {
    let sink = InMemoryAuditSink::new(2);

    sink.record(build_audit_event("default", Some(1), TaskAction::Submit, None));
    sink.record(build_audit_event("default", Some(2), TaskAction::Submit, None));
    sink.record(build_audit_event("default", Some(3), TaskAction::Submit, None));

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].task_id, Some(2)); // First one popped
    assert_eq!(events[1].task_id, Some(3));
}

#[test]
fn test_zero_sized_sink_drops_everything() {
    let sink = InMemoryAuditSink::new(0);
    sink.record(build_audit_event("default", None, TaskAction::Clear, None));
    assert!(sink.events().is_empty());
}

#[test]
fn test_clones_share_buffer() {
    let sink = InMemoryAuditSink::new(8);
    let writer = sink.clone();

    writer.record(build_audit_event("default", Some(4), TaskAction::Start, None));
    writer.record(build_audit_event("default", Some(5), TaskAction::Start, None));
    writer.record(build_audit_event("default", Some(4), TaskAction::Succeed, None));

    let actions: Vec<_> = sink.events_for(4).into_iter().map(|e| e.action).collect();
    assert_eq!(actions, vec![TaskAction::Start, TaskAction::Succeed]);
}

#[test]
fn test_build_audit_event() {
    let event = build_audit_event("uploads", Some(9), TaskAction::Fail, Some("timeout".into()));

    assert_eq!(event.scheduler, "uploads");
    assert_eq!(event.task_id, Some(9));
    assert_eq!(event.action, TaskAction::Fail);
    assert_eq!(event.detail, Some("timeout".to_string()));
    assert!(event.created_at_ms > 0);
    assert_eq!(event.event_id.len(), 36);
    assert_ne!(event.event_id, build_audit_event("uploads", None, TaskAction::Fail, None).event_id);
}
