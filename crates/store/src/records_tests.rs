// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::MemoryStore;
use coders_core::{
    FakeClock, HealthStatus, LoopStatus, PromiseStatus, Tool,
};

fn state(id: &str) -> SessionState {
    SessionState {
        session_id: SessionId::new(id),
        name: id.trim_start_matches("coder-").to_string(),
        tool: Tool::Claude,
        task: "t".to_string(),
        cwd: "/tmp".into(),
        model: None,
        alt_backend: false,
        heartbeat: true,
        restart_on_crash: true,
        max_restarts: 3,
        restart_count: 0,
        last_restart_at: None,
        created_at: 0,
    }
}

#[tokio::test]
async fn session_state_round_trip() {
    let store = MemoryStore::new();
    let state = state("coder-claude-x");
    store.put_session_state(&state).await.unwrap();
    let back = store
        .get_session_state(&state.session_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(back.session_id, state.session_id);
    store.delete_session_state(&state.session_id).await.unwrap();
    assert!(store
        .get_session_state(&state.session_id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn heartbeat_has_ttl() {
    let clock = FakeClock::at(0);
    let store = MemoryStore::with_clock(clock.clone());
    let id = SessionId::new("coder-claude-x");
    let hb = Heartbeat::running(id.clone(), 0);
    store.put_heartbeat(&hb).await.unwrap();
    assert!(store.get_heartbeat(&id).await.unwrap().is_some());
    clock.advance_ms(keys::HEARTBEAT_TTL.as_millis() as u64 + 1);
    assert!(store.get_heartbeat(&id).await.unwrap().is_none());
}

#[tokio::test]
async fn promise_lifecycle() {
    let store = MemoryStore::new();
    let id = SessionId::new("coder-claude-x");
    let promise = Promise {
        session_id: id.clone(),
        timestamp: 1,
        summary: "done".to_string(),
        status: PromiseStatus::Completed,
        blockers: Vec::new(),
    };
    store.put_promise(&promise).await.unwrap();
    assert!(store.get_promise(&id).await.unwrap().is_some());
    // Deleting the promise "resumes" the session
    store.delete_promise(&id).await.unwrap();
    assert!(store.get_promise(&id).await.unwrap().is_none());
}

#[tokio::test]
async fn health_and_summary() {
    let store = MemoryStore::new();
    let id = SessionId::new("coder-claude-x");
    let result = HealthCheckResult {
        session_id: id.clone(),
        timestamp: 0,
        tmux_alive: true,
        process_running: true,
        heartbeat_age_ms: Some(10),
        output_hash: None,
        previous_output_hash: None,
        output_stale_for_ms: 0,
        status: HealthStatus::Healthy,
        message: "ok".to_string(),
    };
    store.put_health(&result).await.unwrap();
    assert!(store.get_health(&id).await.unwrap().is_some());

    let summary = HealthCheckSummary::from_results(0, vec![result]);
    store.put_health_summary(&summary).await.unwrap();
    let back = store.get_health_summary().await.unwrap().unwrap();
    assert_eq!(back.healthy, 1);
}

#[tokio::test]
async fn loop_records() {
    let store = MemoryStore::new();
    let loop_id = LoopId::new("loop-1");
    let state = LoopState {
        loop_id: loop_id.clone(),
        current_task_index: 0,
        total_tasks: 2,
        current_tool: Tool::Claude,
        status: LoopStatus::Running,
        completed_count: 0,
        updated_at: 0,
    };
    store.put_loop_state(&state).await.unwrap();
    assert!(store.get_loop_state(&loop_id).await.unwrap().is_some());

    let note = LoopNotification {
        loop_id,
        timestamp: 5,
        task_count: 2,
        status: LoopStatus::Completed,
        message: "done".to_string(),
    };
    store.publish_loop_notification(&note).await.unwrap();
}

#[tokio::test]
async fn crash_events_keyed_by_timestamp() {
    let store = MemoryStore::new();
    let id = SessionId::new("coder-claude-x");
    for ts in [1, 2] {
        let event = CrashEvent {
            session_id: id.clone(),
            timestamp: ts,
            reason: "r".to_string(),
            will_restart: true,
        };
        store.record_crash_event(&event).await.unwrap();
    }
    let keys = store.scan("coders:crash:*").await.unwrap();
    assert_eq!(keys.len(), 2);
}
