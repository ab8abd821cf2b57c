// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn sample() -> SessionState {
    SessionState {
        session_id: SessionId::new("coder-claude-fix-login"),
        name: "claude-fix-login".to_string(),
        tool: Tool::Claude,
        task: "fix login".to_string(),
        cwd: PathBuf::from("/tmp"),
        model: None,
        alt_backend: false,
        heartbeat: true,
        restart_on_crash: true,
        max_restarts: DEFAULT_MAX_RESTARTS,
        restart_count: 0,
        last_restart_at: None,
        created_at: 1000,
    }
}

#[test]
fn json_round_trip() {
    let state = sample();
    let json = serde_json::to_string(&state).unwrap();
    let back: SessionState = serde_json::from_str(&json).unwrap();
    assert_eq!(back.session_id, state.session_id);
    assert_eq!(back.tool, Tool::Claude);
    assert_eq!(back.max_restarts, 3);
}

#[test]
fn record_restart_bumps_count_and_timestamp() {
    let mut state = sample();
    state.record_restart(5000);
    assert_eq!(state.restart_count, 1);
    assert_eq!(state.last_restart_at, Some(5000));
    state.record_restart(9000);
    assert_eq!(state.restart_count, 2);
}

#[test]
fn budget_exhausted_at_max() {
    let mut state = sample();
    assert!(!state.budget_exhausted());
    state.restart_count = 3;
    assert!(state.budget_exhausted());
}

#[test]
fn missing_optional_fields_default() {
    // Records written by older builds may lack runtime fields.
    let json = r#"{
        "session_id": "coder-claude-x",
        "name": "claude-x",
        "tool": "claude",
        "task": "x",
        "cwd": "/tmp",
        "heartbeat": true,
        "restart_on_crash": true,
        "max_restarts": 3,
        "created_at": 0
    }"#;
    let state: SessionState = serde_json::from_str(json).unwrap();
    assert_eq!(state.restart_count, 0);
    assert!(state.last_restart_at.is_none());
    assert!(!state.alt_backend);
}
