// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end promise gating through the fake multiplexer and store.

use crate::prelude::{assistant_publishes, harness};
use coders_adapters::MuxAdapter;
use coders_core::{LoopId, LoopStatus, PromiseStatus, SessionId, Tool};
use coders_engine::{run_task_loop, LoopConfig, NullSpawner, Shutdown};
use coders_sources::{MultiSource, TodolistSource};
use coders_store::{KvStore, RecordsExt};
use serial_test::serial;
use std::io::Write as _;
use std::time::Duration;

fn fast_config(h: &crate::prelude::Harness, id: &str) -> LoopConfig {
    let mut cfg = LoopConfig::new(LoopId::new(id), h.work_dir.path(), Tool::Claude);
    cfg.promise_poll = Duration::from_millis(10);
    cfg.inter_task_delay = Duration::from_millis(1);
    cfg
}

#[tokio::test]
#[serial]
async fn completed_promise_advances_and_closes_the_task() {
    let h = harness();
    let list = h.work_dir.path().join("t.md");
    let mut file = std::fs::File::create(&list).unwrap();
    file.write_all(b"[ ] write readme\n").unwrap();
    let mut sources = MultiSource::new();
    sources.push(Box::new(TodolistSource::new(&list)));

    let cfg = fast_config(&h, "spec-loop-1");
    let assistant = assistant_publishes(
        &h,
        "coder-claude-write-readme",
        PromiseStatus::Completed,
        "done",
    );
    let (_handle, shutdown) = Shutdown::new();

    let report = run_task_loop(
        &h.mux, &h.store, &NullSpawner, &h.notify, &h.clock, &sources, &cfg, &shutdown,
    )
    .await
    .unwrap();
    assistant.await.unwrap();

    assert_eq!(report.status, LoopStatus::Completed);
    assert_eq!(std::fs::read_to_string(&list).unwrap(), "[x] write readme\n");

    // The terminal records all landed in the store
    let state = h.store.get_loop_state(&cfg.loop_id).await.unwrap().unwrap();
    assert_eq!(
        (state.status, state.current_task_index, state.total_tasks),
        (LoopStatus::Completed, 1, 1)
    );
    assert_eq!(h.store.scan("coders:loop:notify:*").await.unwrap().len(), 1);
}

#[tokio::test]
#[serial]
async fn needs_review_still_counts_as_done_for_gating() {
    let h = harness();
    let list = h.work_dir.path().join("t.md");
    let mut file = std::fs::File::create(&list).unwrap();
    file.write_all(b"[ ] risky change\n").unwrap();
    let mut sources = MultiSource::new();
    sources.push(Box::new(TodolistSource::new(&list)));

    let cfg = fast_config(&h, "spec-loop-2");
    let assistant = assistant_publishes(
        &h,
        "coder-claude-risky-change",
        PromiseStatus::NeedsReview,
        "please check",
    );
    let (_handle, shutdown) = Shutdown::new();

    let report = run_task_loop(
        &h.mux, &h.store, &NullSpawner, &h.notify, &h.clock, &sources, &cfg, &shutdown,
    )
    .await
    .unwrap();
    assistant.await.unwrap();

    // Not blocked, so the loop advances and closes the task
    assert_eq!(report.status, LoopStatus::Completed);
    assert_eq!(report.completed, 1);
}

#[tokio::test]
#[serial]
async fn stale_promise_from_previous_run_is_cleared_before_gating() {
    let h = harness();
    let list = h.work_dir.path().join("t.md");
    let mut file = std::fs::File::create(&list).unwrap();
    file.write_all(b"[ ] recurring chore\n").unwrap();
    let mut sources = MultiSource::new();
    sources.push(Box::new(TodolistSource::new(&list)));

    // A promise left over from an earlier run of the same-named task
    let session = SessionId::new("coder-claude-recurring-chore");
    h.store
        .put_promise(&coders_core::Promise {
            session_id: session.clone(),
            timestamp: 1,
            summary: "old run".to_string(),
            status: PromiseStatus::Completed,
            blockers: Vec::new(),
        })
        .await
        .unwrap();

    let cfg = fast_config(&h, "spec-loop-3");
    let assistant =
        assistant_publishes(&h, "coder-claude-recurring-chore", PromiseStatus::Completed, "fresh");
    let (_handle, shutdown) = Shutdown::new();

    let report = run_task_loop(
        &h.mux, &h.store, &NullSpawner, &h.notify, &h.clock, &sources, &cfg, &shutdown,
    )
    .await
    .unwrap();
    assistant.await.unwrap();

    assert_eq!(report.status, LoopStatus::Completed);
    // The gate waited for the fresh promise, not the stale one
    let promise = h.store.get_promise(&session).await.unwrap().unwrap();
    assert_eq!(promise.summary, "fresh");
    assert!(h.mux.session_exists(&session).await.unwrap());
}
