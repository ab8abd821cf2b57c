// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use coders_adapters::{FakeMux, FakeMuxSession};
use coders_core::FakeClock;
use coders_store::MemoryStore;

fn setup() -> (FakeMux, MemoryStore<FakeClock>, FakeClock, SessionId) {
    let mux = FakeMux::new();
    let clock = FakeClock::at(1_000);
    let store = MemoryStore::with_clock(clock.clone());
    let id = SessionId::new("coder-claude-x");
    mux.add_session(&id, FakeMuxSession::running("/tmp"));
    (mux, store, clock, id)
}

#[tokio::test]
async fn publishes_running_heartbeat() {
    let (mux, store, _clock, id) = setup();
    let alive = emit_once(&mux, &store, &FakeClock::at(1_000), &id, Some("fix it"))
        .await
        .unwrap();
    assert!(alive);
    let hb = store.get_heartbeat(&id).await.unwrap().unwrap();
    assert_eq!(hb.status, "running");
    assert_eq!(hb.timestamp, 1_000);
    assert_eq!(hb.task.as_deref(), Some("fix it"));
}

#[tokio::test]
async fn usage_scraped_from_pane() {
    let (mux, store, clock, id) = setup();
    mux.set_output(&id, vec!["cost: $2.00".into(), "tokens: 99".into()]);
    emit_once(&mux, &store, &clock, &id, None).await.unwrap();
    let hb = store.get_heartbeat(&id).await.unwrap().unwrap();
    let usage = hb.usage.unwrap();
    assert_eq!(usage.cost.as_deref(), Some("$2.00"));
    assert_eq!(usage.tokens, Some(99));
}

#[tokio::test]
async fn plain_output_has_no_usage() {
    let (mux, store, clock, id) = setup();
    mux.set_output(&id, vec!["building...".into()]);
    emit_once(&mux, &store, &clock, &id, None).await.unwrap();
    let hb = store.get_heartbeat(&id).await.unwrap().unwrap();
    assert!(hb.usage.is_none());
}

#[tokio::test]
async fn gone_session_stops_emitter() {
    let (mux, store, clock, id) = setup();
    mux.remove_session(&id);
    let alive = emit_once(&mux, &store, &clock, &id, None).await.unwrap();
    assert!(!alive);
    assert!(store.get_heartbeat(&id).await.unwrap().is_none());
}

#[tokio::test]
async fn loop_exits_on_shutdown() {
    let (mux, store, clock, id) = setup();
    let (handle, shutdown) = Shutdown::new();
    handle.trigger();
    run_heartbeat_emitter(&mux, &store, &clock, &id, Duration::from_secs(30), &shutdown)
        .await
        .unwrap();
    // First beat was still published before the shutdown check
    assert!(store.get_heartbeat(&id).await.unwrap().is_some());
}

#[tokio::test]
async fn loop_exits_when_session_vanishes() {
    let (mux, store, clock, id) = setup();
    mux.remove_session(&id);
    let (_handle, shutdown) = Shutdown::new();
    run_heartbeat_emitter(&mux, &store, &clock, &id, Duration::from_secs(30), &shutdown)
        .await
        .unwrap();
}
