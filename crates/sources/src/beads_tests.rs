// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn maps_issue_fields() {
    let raw = r#"[{
        "id": "bd-42",
        "title": "Fix the flaky test",
        "description": "it fails on CI",
        "status": "in_progress",
        "priority": 1,
        "assignee": "mel",
        "labels": ["ci"],
        "blocked_by": ["bd-40"],
        "blocks": ["bd-50"]
    }]"#;
    let tasks = parse_issue_list(raw).unwrap();
    assert_eq!(tasks.len(), 1);
    let task = &tasks[0];
    assert_eq!(task.id, "bd-42");
    assert_eq!(task.source, "beads");
    assert_eq!(task.status, TaskStatus::InProgress);
    assert_eq!(task.priority, 1);
    assert_eq!(task.blocked_by, vec!["bd-40"]);
}

#[yare::parameterized(
    open       = { "open", TaskStatus::Open },
    ready      = { "ready", TaskStatus::Open },
    working    = { "in_progress", TaskStatus::InProgress },
    closed     = { "closed", TaskStatus::Completed },
    blocked    = { "blocked", TaskStatus::Blocked },
    cancelled  = { "cancelled", TaskStatus::Cancelled },
    unknown    = { "weird", TaskStatus::Open },
)]
fn status_mapping(raw: &str, expected: TaskStatus) {
    assert_eq!(map_status(raw), expected);
}

#[test]
fn priority_clamped_into_range() {
    let raw = r#"[{"id": "bd-1", "title": "t", "priority": 99}]"#;
    let tasks = parse_issue_list(raw).unwrap();
    assert_eq!(tasks[0].priority, 4);
}

#[test]
fn minimal_issue_defaults() {
    let task = parse_issue(r#"{"id": "bd-1", "title": "t"}"#).unwrap();
    assert_eq!(task.status, TaskStatus::Open);
    assert!(task.labels.is_empty());
    assert!(task.is_ready());
}

#[test]
fn bad_json_is_read_error() {
    assert!(matches!(
        parse_issue_list("not json").unwrap_err(),
        SourceError::Read(_)
    ));
}

#[tokio::test]
async fn missing_binary_is_unavailable() {
    let source = BeadsSource::new("definitely-not-bd-xyz");
    let err = source.list(&TaskFilter::default()).await.unwrap_err();
    assert!(matches!(err, SourceError::Unavailable(_)));
}
