// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use coders_adapters::FakeMux;
use coders_core::FakeClock;
use coders_store::MemoryStore;
use serial_test::serial;

fn fast_ready_env() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::env::set_var("CODERS_READY_TIMEOUT_MS", "50");
    std::env::set_var("CODERS_STATE_DIR", dir.path());
    dir
}

fn request(dir: &tempfile::TempDir) -> LaunchRequest {
    LaunchRequest::new(Tool::Claude, "write the readme", dir.path())
}

#[tokio::test]
#[serial]
async fn launch_creates_session_with_derived_id() {
    let _env = fast_ready_env();
    let mux = FakeMux::new();
    let store = MemoryStore::new();
    let clock = FakeClock::at(5_000);
    let dir = tempfile::tempdir().unwrap();

    let report = launch(&mux, Some(&store), &NullSpawner, &clock, &request(&dir))
        .await
        .unwrap();

    assert_eq!(report.session_id.as_str(), "coder-claude-write-the-readme");
    assert!(mux.session_exists(&report.session_id).await.unwrap());
    assert!(report.ready);
}

#[tokio::test]
#[serial]
async fn command_line_carries_session_env_and_prompt_redirect() {
    let _env = fast_ready_env();
    let mux = FakeMux::new();
    let store = MemoryStore::new();
    let clock = FakeClock::at(0);
    let dir = tempfile::tempdir().unwrap();

    let report = launch(&mux, Some(&store), &NullSpawner, &clock, &request(&dir))
        .await
        .unwrap();

    let session = mux.session(&report.session_id).unwrap();
    assert!(session
        .command_line
        .contains("CODERS_SESSION_ID=coder-claude-write-the-readme"));
    assert!(session.command_line.contains("claude <"));
    // Prompt file was written with the task and the publish instruction
    let prompt_path = crate::paths::prompt_file(&report.session_id);
    let prompt = std::fs::read_to_string(prompt_path).unwrap();
    assert!(prompt.starts_with("TASK: write the readme"));
    assert!(prompt.contains("/coders:promise"));
}

#[tokio::test]
#[serial]
async fn conflicting_session_id_fails() {
    let _env = fast_ready_env();
    let mux = FakeMux::new();
    let store = MemoryStore::new();
    let clock = FakeClock::at(0);
    let dir = tempfile::tempdir().unwrap();
    let req = request(&dir);

    launch(&mux, Some(&store), &NullSpawner, &clock, &req)
        .await
        .unwrap();
    let err = launch(&mux, Some(&store), &NullSpawner, &clock, &req)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::SessionConflict(_)));
}

#[tokio::test]
#[serial]
async fn missing_cwd_fails() {
    let _env = fast_ready_env();
    let mux = FakeMux::new();
    let store = MemoryStore::new();
    let clock = FakeClock::at(0);
    let mut req = LaunchRequest::new(Tool::Claude, "x", "/nonexistent/place");
    req.session_id = Some(SessionId::new("coder-claude-x"));

    let err = launch(&mux, Some(&store), &NullSpawner, &clock, &req)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::DirectoryNotFound(_)));
}

#[tokio::test]
#[serial]
async fn restart_on_crash_persists_session_state() {
    let _env = fast_ready_env();
    let mux = FakeMux::new();
    let store = MemoryStore::new();
    let clock = FakeClock::at(9_000);
    let dir = tempfile::tempdir().unwrap();
    let mut req = request(&dir);
    req.restart_on_crash = true;
    req.max_restarts = 2;

    let report = launch(&mux, Some(&store), &NullSpawner, &clock, &req)
        .await
        .unwrap();
    let state = store
        .get_session_state(&report.session_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(state.restart_count, 0);
    assert_eq!(state.max_restarts, 2);
    assert_eq!(state.created_at, 9_000);
    assert_eq!(state.tool, Tool::Claude);
}

#[tokio::test]
#[serial]
async fn no_store_degrades_with_warning() {
    let _env = fast_ready_env();
    let mux = FakeMux::new();
    let clock = FakeClock::at(0);
    let dir = tempfile::tempdir().unwrap();
    let mut req = request(&dir);
    req.restart_on_crash = true;

    let report = launch(
        &mux,
        None::<&MemoryStore>,
        &NullSpawner,
        &clock,
        &req,
    )
    .await
    .unwrap();
    assert!(report
        .warnings
        .iter()
        .any(|w| w.contains("without crash-restart")));
}

#[tokio::test]
#[serial]
async fn readiness_timeout_is_warning_not_error() {
    let _env = fast_ready_env();
    let mux = FakeMux::new();
    mux.set_spawn_tool_running(false);
    let store = MemoryStore::new();
    let clock = FakeClock::at(0);
    let dir = tempfile::tempdir().unwrap();
    let req = request(&dir);

    let report = launch(&mux, Some(&store), &NullSpawner, &clock, &req)
        .await
        .unwrap();
    assert!(!report.ready);
    assert!(report.warnings.iter().any(|w| w.contains("not observed")));
    // The session itself is still up
    assert!(mux.session_exists(&report.session_id).await.unwrap());
}

#[tokio::test]
#[serial]
async fn pinned_session_id_wins_over_derived() {
    let _env = fast_ready_env();
    let mux = FakeMux::new();
    let store = MemoryStore::new();
    let clock = FakeClock::at(0);
    let dir = tempfile::tempdir().unwrap();
    let mut req = request(&dir);
    req.session_id = Some(SessionId::new("coder-claude-pinned"));

    let report = launch(&mux, Some(&store), &NullSpawner, &clock, &req)
        .await
        .unwrap();
    assert_eq!(report.session_id.as_str(), "coder-claude-pinned");
}

#[tokio::test]
#[serial]
async fn relaunch_rebuilds_with_restart_note() {
    let _env = fast_ready_env();
    let mux = FakeMux::new();
    let dir = tempfile::tempdir().unwrap();
    let id = SessionId::new("coder-claude-retry");
    let state = SessionState {
        session_id: id.clone(),
        name: "claude-retry".to_string(),
        tool: Tool::Claude,
        task: "keep going".to_string(),
        cwd: dir.path().to_path_buf(),
        model: None,
        alt_backend: false,
        heartbeat: false,
        restart_on_crash: true,
        max_restarts: 3,
        restart_count: 1,
        last_restart_at: Some(1),
        created_at: 0,
    };

    relaunch(&mux, &NullSpawner, &state).await.unwrap();
    assert!(mux.session_exists(&id).await.unwrap());
    let prompt = std::fs::read_to_string(crate::paths::prompt_file(&id)).unwrap();
    assert!(prompt.contains("restart #1"));
}

#[tokio::test]
async fn resolve_cwd_accepts_absolute_dir() {
    let dir = tempfile::tempdir().unwrap();
    let resolved = resolve_cwd(dir.path().to_str().unwrap()).await.unwrap();
    assert_eq!(resolved, dir.path());
}

#[tokio::test]
async fn resolve_cwd_rejects_missing() {
    let err = resolve_cwd("/definitely/not/here").await.unwrap_err();
    assert!(matches!(err, EngineError::DirectoryNotFound(_)));
}
