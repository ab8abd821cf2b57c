// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Periodic health classification for every managed session.
//!
//! The checker never talks to consumers directly: it writes per-session
//! results and one summary into the store and stops there.

use crate::error::EngineError;
use crate::shutdown::Shutdown;
use coders_adapters::MuxAdapter;
use coders_core::{
    classify_heartbeat_age, format_elapsed_ms, HealthCheckResult, HealthCheckSummary, HealthStatus,
    SessionId, OUTPUT_STUCK_AFTER,
};
use coders_core::Clock;
use coders_store::{KvStore, RecordsExt};
use sha2::{Digest, Sha256};
use std::time::Duration;

/// Pane lines fed into the content hash.
const HASH_TAIL_LINES: u32 = 50;

/// Hex digest of the pane tail, for change detection.
pub fn hash_pane_tail(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Classify one session.
async fn check_session<M, S, C>(
    mux: &M,
    store: &S,
    clock: &C,
    session_id: &SessionId,
) -> HealthCheckResult
where
    M: MuxAdapter,
    S: KvStore,
    C: Clock,
{
    let now = clock.now_ms();
    let mut result = HealthCheckResult {
        session_id: session_id.clone(),
        timestamp: now,
        tmux_alive: true,
        process_running: false,
        heartbeat_age_ms: None,
        output_hash: None,
        previous_output_hash: None,
        output_stale_for_ms: 0,
        status: HealthStatus::Healthy,
        message: String::new(),
    };

    // A published promise means the session finished its task; nothing else
    // matters.
    if let Ok(Some(_)) = store.get_promise(session_id).await {
        result.message = "Session completed its task".to_string();
        return result;
    }

    // No pane processes: unresponsive, no further classification.
    match mux.pane_pids(session_id).await {
        Ok(pids) if pids.is_empty() => {
            result.status = HealthStatus::Unresponsive;
            result.message = "No processes in pane".to_string();
            return result;
        }
        Ok(_) => result.process_running = true,
        Err(_) => {
            result.tmux_alive = false;
            result.status = HealthStatus::Unresponsive;
            result.message = "Pane not inspectable".to_string();
            return result;
        }
    }

    // Output-change tracking against the previous result.
    if let Ok(pane) = mux.capture_pane(session_id, HASH_TAIL_LINES).await {
        let hash = hash_pane_tail(&pane);
        if let Ok(Some(previous)) = store.get_health(session_id).await {
            result.previous_output_hash = previous.output_hash.clone();
            if previous.output_hash.as_deref() == Some(hash.as_str()) {
                result.output_stale_for_ms =
                    previous.output_stale_for_ms + now.saturating_sub(previous.timestamp);
            }
        }
        result.output_hash = Some(hash);
    }

    // Heartbeat age drives the base classification.
    match store.get_heartbeat(session_id).await {
        Ok(Some(heartbeat)) => {
            let age_ms = now.saturating_sub(heartbeat.timestamp);
            result.heartbeat_age_ms = Some(age_ms);
            result.status = classify_heartbeat_age(Duration::from_millis(age_ms));
            result.message = match result.status {
                HealthStatus::Healthy => "Session is healthy".to_string(),
                HealthStatus::Stale => {
                    format!("Heartbeat stale for {}", format_elapsed_ms(age_ms))
                }
                _ => format!("No heartbeat for {}", format_elapsed_ms(age_ms)),
            };
        }
        Ok(None) => {
            if session_id.is_orchestrator() {
                // Human-driven session; no emitter expected.
                result.message = "Orchestrator session".to_string();
                return result;
            }
            result.status = HealthStatus::Dead;
            result.message = "No heartbeat recorded".to_string();
        }
        Err(e) => {
            tracing::warn!(session_id = %session_id, error = %e, "heartbeat read failed");
            result.status = HealthStatus::Stale;
            result.message = "Heartbeat unreadable".to_string();
        }
    }

    // A live heartbeat with frozen output means the tool is wedged.
    if result.status == HealthStatus::Healthy
        && result.output_stale_for_ms > OUTPUT_STUCK_AFTER.as_millis() as u64
    {
        result.status = HealthStatus::Stuck;
        result.message = format!(
            "Output unchanged for {}",
            format_elapsed_ms(result.output_stale_for_ms)
        );
    }

    result
}

/// Check every managed session once and publish results plus summary.
pub async fn run_health_check_once<M, S, C>(
    mux: &M,
    store: &S,
    clock: &C,
) -> Result<HealthCheckSummary, EngineError>
where
    M: MuxAdapter,
    S: KvStore,
    C: Clock,
{
    let sessions = mux.list().await?;
    let mut results = Vec::with_capacity(sessions.len());

    for session in &sessions {
        let result = check_session(mux, store, clock, &session.id).await;
        if let Err(e) = store.put_health(&result).await {
            tracing::warn!(session_id = %session.id, error = %e, "health result write failed");
        }
        results.push(result);
    }

    let summary = HealthCheckSummary::from_results(clock.now_ms(), results);
    store.put_health_summary(&summary).await?;
    Ok(summary)
}

/// Watch mode: run the one-shot check every `interval` until shutdown.
pub async fn run_health_check_watch<M, S, C>(
    mux: &M,
    store: &S,
    clock: &C,
    interval: Duration,
    shutdown: &Shutdown,
    mut on_summary: impl FnMut(&HealthCheckSummary),
) -> Result<(), EngineError>
where
    M: MuxAdapter,
    S: KvStore,
    C: Clock,
{
    loop {
        match run_health_check_once(mux, store, clock).await {
            Ok(summary) => on_summary(&summary),
            // Transient failures: keep watching
            Err(e) => tracing::warn!(error = %e, "health check pass failed"),
        }

        tokio::select! {
            _ = shutdown.cancelled() => return Ok(()),
            _ = tokio::time::sleep(interval) => {}
        }
    }
}

#[cfg(test)]
#[path = "checker_tests.rs"]
mod tests;
