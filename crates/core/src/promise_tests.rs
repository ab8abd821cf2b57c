// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    completed    = { "completed", PromiseStatus::Completed },
    blocked      = { "blocked", PromiseStatus::Blocked },
    needs_review = { "needs-review", PromiseStatus::NeedsReview },
)]
fn status_parses(input: &str, expected: PromiseStatus) {
    assert_eq!(input.parse::<PromiseStatus>().unwrap(), expected);
    assert_eq!(expected.to_string(), input);
}

#[test]
fn status_rejects_unknown() {
    assert!("done".parse::<PromiseStatus>().is_err());
}

#[test]
fn serde_uses_kebab_case() {
    let json = serde_json::to_string(&PromiseStatus::NeedsReview).unwrap();
    assert_eq!(json, "\"needs-review\"");
}

#[test]
fn promise_round_trip() {
    let promise = Promise {
        session_id: SessionId::new("coder-claude-x"),
        timestamp: 99,
        summary: "done".to_string(),
        status: PromiseStatus::Blocked,
        blockers: vec!["needs credentials".to_string()],
    };
    let json = serde_json::to_string(&promise).unwrap();
    let back: Promise = serde_json::from_str(&json).unwrap();
    assert_eq!(back.status, PromiseStatus::Blocked);
    assert_eq!(back.blockers.len(), 1);
}

#[test]
fn empty_blockers_omitted() {
    let promise = Promise {
        session_id: SessionId::new("coder-claude-x"),
        timestamp: 99,
        summary: "done".to_string(),
        status: PromiseStatus::Completed,
        blockers: Vec::new(),
    };
    let json = serde_json::to_string(&promise).unwrap();
    assert!(!json.contains("blockers"));
}
