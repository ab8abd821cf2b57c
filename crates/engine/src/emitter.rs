// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-session heartbeat emitter.
//!
//! One detached process per session: publish immediately on start, then
//! once per interval until the session disappears or a signal arrives.
//! The record carries a TTL, so a stopped emitter simply ages out.

use crate::error::EngineError;
use crate::shutdown::Shutdown;
use crate::usage::parse_usage;
use coders_adapters::MuxAdapter;
use coders_core::{Clock, Heartbeat, SessionId};
use coders_store::{KvStore, RecordsExt};
use std::time::Duration;

/// How much pane tail the usage scraper sees.
const USAGE_TAIL_LINES: u32 = 100;

/// Publish one heartbeat. Returns `false` when the session is gone and the
/// emitter should stop.
pub async fn emit_once<M, S, C>(
    mux: &M,
    store: &S,
    clock: &C,
    session_id: &SessionId,
    task: Option<&str>,
) -> Result<bool, EngineError>
where
    M: MuxAdapter,
    S: KvStore,
    C: Clock,
{
    if !mux.session_exists(session_id).await? {
        return Ok(false);
    }

    let mut heartbeat = Heartbeat::running(session_id.clone(), clock.now_ms());
    heartbeat.task = task.map(str::to_string);

    match mux.capture_pane(session_id, USAGE_TAIL_LINES).await {
        Ok(pane) => heartbeat.usage = parse_usage(&pane),
        Err(e) => {
            // A capture hiccup is not worth losing the liveness signal over.
            tracing::debug!(session_id = %session_id, error = %e, "pane capture failed");
        }
    }

    store.put_heartbeat(&heartbeat).await?;
    Ok(true)
}

/// Run the emitter loop until the session disappears or shutdown fires.
pub async fn run_heartbeat_emitter<M, S, C>(
    mux: &M,
    store: &S,
    clock: &C,
    session_id: &SessionId,
    interval: Duration,
    shutdown: &Shutdown,
) -> Result<(), EngineError>
where
    M: MuxAdapter,
    S: KvStore,
    C: Clock,
{
    let task = store
        .get_session_state(session_id)
        .await
        .ok()
        .flatten()
        .map(|state| state.task);

    tracing::info!(session_id = %session_id, interval_secs = interval.as_secs(), "heartbeat emitter started");

    loop {
        match emit_once(mux, store, clock, session_id, task.as_deref()).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::info!(session_id = %session_id, "session gone, emitter stopping");
                return Ok(());
            }
            // Transient store errors: retry on the next tick
            Err(e) => tracing::warn!(session_id = %session_id, error = %e, "heartbeat publish failed"),
        }

        tokio::select! {
            _ = shutdown.cancelled() => {
                tracing::info!(session_id = %session_id, "emitter shutting down");
                return Ok(());
            }
            _ = tokio::time::sleep(interval) => {}
        }
    }
}

#[cfg(test)]
#[path = "emitter_tests.rs"]
mod tests;
