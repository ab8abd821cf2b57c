// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for the behavioral specs.

use coders_adapters::{FakeMux, FakeNotifyAdapter};
use coders_core::{Clock, FakeClock, Promise, PromiseStatus, SessionId};
use coders_store::{MemoryStore, RecordsExt};
use std::time::Duration;

pub struct Harness {
    pub mux: FakeMux,
    pub store: MemoryStore<FakeClock>,
    pub clock: FakeClock,
    pub notify: FakeNotifyAdapter,
    pub state_dir: tempfile::TempDir,
    pub work_dir: tempfile::TempDir,
}

/// Fake-backed world with a fast readiness budget. Callers must hold the
/// env-var lock (`#[serial]`) for the harness lifetime.
pub fn harness() -> Harness {
    let state_dir = tempfile::tempdir().unwrap();
    std::env::set_var("CODERS_STATE_DIR", state_dir.path());
    std::env::set_var("CODERS_READY_TIMEOUT_MS", "20");
    let clock = FakeClock::at(1_000_000);
    Harness {
        mux: FakeMux::new(),
        store: MemoryStore::with_clock(clock.clone()),
        clock,
        notify: FakeNotifyAdapter::new(),
        state_dir,
        work_dir: tempfile::tempdir().unwrap(),
    }
}

/// Publish a promise for `session` as soon as its window exists, as the
/// assistant inside the session would.
pub fn assistant_publishes(
    h: &Harness,
    session: &str,
    status: PromiseStatus,
    summary: &str,
) -> tokio::task::JoinHandle<()> {
    let mux = h.mux.clone();
    let store = h.store.clone();
    let clock = h.clock.clone();
    let id = SessionId::new(session);
    let summary = summary.to_string();
    tokio::spawn(async move {
        use coders_adapters::MuxAdapter;
        loop {
            if mux.session_exists(&id).await.unwrap_or(false) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        store
            .put_promise(&Promise {
                session_id: id,
                timestamp: clock.now_ms(),
                summary,
                status,
                blockers: Vec::new(),
            })
            .await
            .unwrap();
    })
}
