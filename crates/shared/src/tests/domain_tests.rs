use chrono::{Local, TimeZone, Utc};
use serde_json::json;

use crate::{
    domain::{Interview, Role, Task, TaskId, TaskStatus},
    protocol::{InterviewCreateRequest, TaskStatusUpdate},
};

#[test]
fn status_uses_display_strings_on_the_wire() {
    assert_eq!(
        serde_json::to_value(TaskStatus::InProgress).expect("json"),
        json!("In Progress")
    );
    let parsed: TaskStatus = serde_json::from_value(json!("Completed")).expect("status");
    assert_eq!(parsed, TaskStatus::Completed);
}

#[test]
fn unknown_status_is_rejected() {
    let err = serde_json::from_value::<TaskStatus>(json!("Archived"));
    assert!(err.is_err());
}

#[test]
fn transition_table_only_moves_forward() {
    assert_eq!(TaskStatus::Pending.next(), Some(TaskStatus::InProgress));
    assert_eq!(TaskStatus::InProgress.next(), Some(TaskStatus::Completed));
    assert_eq!(TaskStatus::Completed.next(), None);
    assert!(TaskStatus::Completed.is_terminal());
}

#[test]
fn task_ids_accept_numbers_and_strings() {
    let numeric: Task = serde_json::from_value(json!({
        "id": 42,
        "title": "Leave request",
        "description": "Need 2 days off",
        "assigned_to": "Virtual HR",
        "status": "Pending",
        "created_at": "2024-05-01T09:00:00Z"
    }))
    .expect("task");
    assert_eq!(numeric.id, TaskId::new("42"));
    assert_eq!(
        numeric.created_at,
        Some(Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap())
    );

    let textual: Task = serde_json::from_value(json!({
        "id": "t1",
        "title": "Leave request",
        "description": "Need 2 days off",
        "assigned_to": "Virtual HR",
        "status": "In Progress"
    }))
    .expect("task");
    assert_eq!(textual.id.as_str(), "t1");
    assert_eq!(textual.status, TaskStatus::InProgress);
    assert_eq!(textual.created_at, None);
}

#[test]
fn interview_meeting_link_is_optional() {
    let interview: Interview = serde_json::from_value(json!({
        "id": "i1",
        "candidate_name": "A. Kumar",
        "position": "Backend Engineer",
        "scheduled_at": "2024-06-03T14:00:00Z"
    }))
    .expect("interview");
    assert!(interview.meeting_link.is_none());
    assert_eq!(
        interview.scheduled_at,
        Utc.with_ymd_and_hms(2024, 6, 3, 14, 0, 0).unwrap()
    );
}

#[test]
fn status_update_serializes_only_status() {
    let body = serde_json::to_value(TaskStatusUpdate {
        status: Some(TaskStatus::Completed),
    })
    .expect("json");
    assert_eq!(body, json!({ "status": "Completed" }));
}

#[test]
fn interview_request_sends_local_time_without_offset() {
    let scheduled_at = Local
        .with_ymd_and_hms(2024, 6, 3, 14, 0, 0)
        .earliest()
        .expect("local")
        .with_timezone(&Utc);
    let body = serde_json::to_value(InterviewCreateRequest {
        candidate_name: "A. Kumar".into(),
        position: "Backend Engineer".into(),
        scheduled_at,
    })
    .expect("json");
    assert_eq!(body["scheduled_at"], json!("2024-06-03T14:00:00"));
}

#[test]
fn roles_are_snake_case() {
    assert_eq!(serde_json::to_value(Role::Hr).expect("json"), json!("hr"));
    assert_eq!(
        serde_json::to_value(Role::Employee).expect("json"),
        json!("employee")
    );
}
