// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session-name grammar: the supervisor and the task loop must agree on
//! ids exactly, or promise gating silently waits forever.

use crate::prelude::harness;
use coders_core::{session_name, slugify, Clock, SessionId, Tool, SESSION_PREFIX};
use coders_engine::{launch, LaunchRequest, NullSpawner};
use serial_test::serial;

#[test]
fn every_derived_id_carries_the_reserved_prefix() {
    for tool in Tool::ALL {
        for task in ["fix the bug", "", "???", "Très long été"] {
            let id = SessionId::for_task(tool, task, 1_726_012_345);
            assert!(id.as_str().starts_with(SESSION_PREFIX), "id {}", id);
            assert!(id.is_managed());
        }
    }
}

#[test]
fn derived_ids_match_the_slug_grammar() {
    let id = SessionId::for_task(Tool::Claude, "Fix: the login_button!", 0);
    let name = id.as_str().strip_prefix(SESSION_PREFIX).unwrap();
    // name is <tool>-<slug>; every char is lowercase alphanumeric or hyphen
    assert!(name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
    assert!(name.starts_with("claude-"));
}

#[yare::parameterized(
    simple    = { "write readme" },
    punct     = { "fix: the thing!" },
    long      = { "a very long task description that exceeds the slug budget" },
)]
fn slug_is_idempotent(task: &str) {
    let once = slugify(task);
    assert_eq!(slugify(&once), once);
}

#[test]
fn empty_task_yields_timestamp_fallback() {
    assert_eq!(session_name(Tool::Claude, "", 1_726_000_042), "claude-42");
    assert_eq!(session_name(Tool::Codex, "!!!", 1_726_004_207), "codex-4207");
}

#[tokio::test]
#[serial]
async fn supervisor_creates_the_id_the_loop_computes() {
    // The loop derives the promise key before launching; the supervisor
    // must create exactly that session.
    let h = harness();
    let task_title = "Polish the CHANGELOG";
    let expected = SessionId::for_task(Tool::Claude, task_title, h.clock.now_ms() / 1000);

    let mut req = LaunchRequest::new(Tool::Claude, task_title, h.work_dir.path());
    req.heartbeat = false;
    let report = launch(&h.mux, Some(&h.store), &NullSpawner, &h.clock, &req)
        .await
        .unwrap();

    assert_eq!(report.session_id, expected);
    use coders_adapters::MuxAdapter;
    assert!(h.mux.session_exists(&expected).await.unwrap());
}
