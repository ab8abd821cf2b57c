// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use coders_adapters::{FakeMux, FakeMuxSession};
use coders_core::{FakeClock, Heartbeat, Promise, PromiseStatus};
use coders_store::MemoryStore;

fn setup(id: &str) -> (FakeMux, MemoryStore<FakeClock>, FakeClock, SessionId) {
    let mux = FakeMux::new();
    let clock = FakeClock::at(1_000_000);
    let store = MemoryStore::with_clock(clock.clone());
    let id = SessionId::new(id);
    mux.add_session(&id, FakeMuxSession::running("/tmp"));
    (mux, store, clock, id)
}

async fn beat(store: &MemoryStore<FakeClock>, id: &SessionId, at_ms: u64) {
    store
        .put_heartbeat(&Heartbeat::running(id.clone(), at_ms))
        .await
        .unwrap();
}

#[tokio::test]
async fn fresh_heartbeat_is_healthy() {
    let (mux, store, clock, id) = setup("coder-claude-x");
    beat(&store, &id, clock.now_ms() - 10_000).await;
    let summary = run_health_check_once(&mux, &store, &clock).await.unwrap();
    assert_eq!(summary.healthy, 1);
    assert_eq!(summary.results[0].status, HealthStatus::Healthy);
    assert_eq!(summary.results[0].message, "Session is healthy");
}

#[tokio::test]
async fn stale_and_dead_boundaries() {
    let (mux, store, clock, id) = setup("coder-claude-x");

    beat(&store, &id, clock.now_ms() - 59_000).await;
    let summary = run_health_check_once(&mux, &store, &clock).await.unwrap();
    assert_eq!(summary.results[0].status, HealthStatus::Healthy);

    beat(&store, &id, clock.now_ms() - 60_000).await;
    let summary = run_health_check_once(&mux, &store, &clock).await.unwrap();
    assert_eq!(summary.results[0].status, HealthStatus::Stale);

    beat(&store, &id, clock.now_ms() - 299_000).await;
    let summary = run_health_check_once(&mux, &store, &clock).await.unwrap();
    assert_eq!(summary.results[0].status, HealthStatus::Stale);

    beat(&store, &id, clock.now_ms() - 300_000).await;
    let summary = run_health_check_once(&mux, &store, &clock).await.unwrap();
    assert_eq!(summary.results[0].status, HealthStatus::Dead);
}

#[tokio::test]
async fn promise_short_circuits_to_healthy() {
    let (mux, store, clock, id) = setup("coder-claude-x");
    // No heartbeat at all, but a promise exists
    store
        .put_promise(&Promise {
            session_id: id.clone(),
            timestamp: 1,
            summary: "done".to_string(),
            status: PromiseStatus::Completed,
            blockers: Vec::new(),
        })
        .await
        .unwrap();
    let summary = run_health_check_once(&mux, &store, &clock).await.unwrap();
    assert_eq!(summary.results[0].status, HealthStatus::Healthy);
    assert_eq!(summary.results[0].message, "Session completed its task");
}

#[tokio::test]
async fn empty_pane_is_unresponsive() {
    let (mux, store, clock, id) = setup("coder-claude-x");
    beat(&store, &id, clock.now_ms()).await;
    mux.set_pids(&id, Vec::new());
    let summary = run_health_check_once(&mux, &store, &clock).await.unwrap();
    assert_eq!(summary.results[0].status, HealthStatus::Unresponsive);
    // No further classification happened
    assert!(summary.results[0].heartbeat_age_ms.is_none());
}

#[tokio::test]
async fn unchanged_output_accumulates_and_upgrades_to_stuck() {
    let (mux, store, clock, id) = setup("coder-claude-x");
    mux.set_output(&id, vec!["same output".into()]);

    // First pass: hash recorded, stale counter starts at zero
    beat(&store, &id, clock.now_ms()).await;
    let summary = run_health_check_once(&mux, &store, &clock).await.unwrap();
    assert_eq!(summary.results[0].status, HealthStatus::Healthy);
    assert_eq!(summary.results[0].output_stale_for_ms, 0);

    // 301 seconds later with identical output and a fresh heartbeat
    clock.advance_ms(301_000);
    beat(&store, &id, clock.now_ms()).await;
    let summary = run_health_check_once(&mux, &store, &clock).await.unwrap();
    assert_eq!(summary.results[0].status, HealthStatus::Stuck);
    assert_eq!(
        summary.results[0].message,
        "Output unchanged for 5m1s"
    );
}

#[tokio::test]
async fn changed_output_resets_stale_counter() {
    let (mux, store, clock, id) = setup("coder-claude-x");
    mux.set_output(&id, vec!["one".into()]);
    beat(&store, &id, clock.now_ms()).await;
    run_health_check_once(&mux, &store, &clock).await.unwrap();

    clock.advance_ms(400_000);
    mux.set_output(&id, vec!["two".into()]);
    beat(&store, &id, clock.now_ms()).await;
    let summary = run_health_check_once(&mux, &store, &clock).await.unwrap();
    assert_eq!(summary.results[0].status, HealthStatus::Healthy);
    assert_eq!(summary.results[0].output_stale_for_ms, 0);
}

#[tokio::test]
async fn orchestrator_without_heartbeat_is_healthy() {
    let (mux, store, clock, _id) = setup("coder-orchestrator");
    let summary = run_health_check_once(&mux, &store, &clock).await.unwrap();
    assert_eq!(summary.results[0].status, HealthStatus::Healthy);
    assert_eq!(summary.results[0].message, "Orchestrator session");
}

#[tokio::test]
async fn worker_without_heartbeat_is_dead() {
    let (mux, store, clock, _id) = setup("coder-claude-x");
    let summary = run_health_check_once(&mux, &store, &clock).await.unwrap();
    assert_eq!(summary.results[0].status, HealthStatus::Dead);
}

#[tokio::test]
async fn summary_is_persisted() {
    let (mux, store, clock, id) = setup("coder-claude-x");
    beat(&store, &id, clock.now_ms()).await;
    run_health_check_once(&mux, &store, &clock).await.unwrap();
    let summary = store.get_health_summary().await.unwrap().unwrap();
    assert_eq!(summary.results.len(), 1);
    assert!(store.get_health(&id).await.unwrap().is_some());
}

#[test]
fn hash_is_stable_and_sensitive() {
    assert_eq!(hash_pane_tail("abc"), hash_pane_tail("abc"));
    assert_ne!(hash_pane_tail("abc"), hash_pane_tail("abd"));
    assert_eq!(hash_pane_tail("x").len(), 64);
}
