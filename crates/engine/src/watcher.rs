// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-session crash watcher.
//!
//! Detects tool crashes from the pane, debounces over two consecutive
//! ticks, and drives restarts against a bounded budget. All outcomes are
//! encoded into `SessionState` and `CrashEvent` records; the watcher never
//! surfaces errors to a user.

use crate::detach::WorkerSpawner;
use crate::error::EngineError;
use crate::shutdown::Shutdown;
use crate::supervisor::relaunch;
use coders_adapters::MuxAdapter;
use coders_core::{Clock, CrashEvent, SessionId, SessionState};
use coders_store::{KvStore, RecordsExt};
use std::time::Duration;

/// Fixed, case-sensitive substrings treated as crash evidence in the pane.
///
/// Deliberately small: pane scanning is heuristic, and the two-tick
/// debounce is the real guard against false positives.
pub const CRASH_INDICATORS: &[&str] = &[
    "error:",
    "Error:",
    "panic:",
    "fatal:",
    "FATAL:",
    "Segmentation fault",
    "Killed",
    "OOM",
    "command not found",
];

/// Pane tail inspected per tick.
const CRASH_TAIL_LINES: u32 = 50;

/// Lines considered for the shell-prompt check.
const PROMPT_TAIL_LINES: usize = 5;

/// Pause between killing a crashed session and rebuilding it.
const RESTART_PAUSE: Duration = Duration::from_millis(500);

/// Consecutive positive checks required to confirm a crash.
const DEBOUNCE_STRIKES: u8 = 2;

/// First crash indicator found in the pane tail, if any.
pub fn crash_indicator(tail: &str) -> Option<&'static str> {
    CRASH_INDICATORS
        .iter()
        .find(|needle| tail.contains(*needle))
        .copied()
}

/// Whether the last non-empty of the final lines looks like a shell prompt.
///
/// The session window execs into a shell when the tool exits, so a prompt
/// where the tool should be is the cleanest crash signal we have.
pub fn shell_prompt_visible(tail: &str) -> bool {
    tail.lines()
        .rev()
        .take(PROMPT_TAIL_LINES)
        .find(|line| !line.trim().is_empty())
        .map(|line| {
            let trimmed = line.trim_end();
            trimmed.ends_with('$')
                || trimmed.ends_with('#')
                || trimmed.ends_with('%')
                || trimmed.ends_with('>')
        })
        .unwrap_or(false)
}

/// One crash probe. Returns the reason when the session looks crashed.
pub async fn check_crashed<M: MuxAdapter>(
    mux: &M,
    state: &SessionState,
) -> Option<String> {
    match mux.session_exists(&state.session_id).await {
        Ok(false) => return Some("session no longer exists".to_string()),
        Ok(true) => {}
        // Can't reach the multiplexer; treat as a negative check and let the
        // next tick decide.
        Err(e) => {
            tracing::debug!(session_id = %state.session_id, error = %e, "crash probe skipped");
            return None;
        }
    }

    match mux.pane_pids(&state.session_id).await {
        Ok(pids) if pids.is_empty() => return Some("no processes in pane".to_string()),
        Ok(_) => {}
        Err(_) => return Some("pane not inspectable".to_string()),
    }

    let tail = match mux.capture_pane(&state.session_id, CRASH_TAIL_LINES).await {
        Ok(tail) => tail,
        Err(_) => return None,
    };

    if let Some(indicator) = crash_indicator(&tail) {
        return Some(format!("crash indicator in output: {:?}", indicator));
    }

    let tool_alive = mux
        .tool_process_running(&state.session_id, state.tool.process_patterns())
        .await
        .unwrap_or(true);
    if !tool_alive && shell_prompt_visible(&tail) {
        return Some(format!("{} exited, shell prompt visible", state.tool));
    }

    None
}

/// Why the watcher stopped.
#[derive(Debug, PartialEq, Eq)]
pub enum WatcherExit {
    /// The restart budget ran out; state was deleted.
    BudgetExhausted,
    /// The session's state vanished (session released elsewhere).
    StateGone,
    /// SIGINT/SIGTERM; state untouched.
    Signalled,
}

/// Watch one session until its budget runs out or shutdown fires.
pub async fn run_crash_watcher<M, S, W, C>(
    mux: &M,
    store: &S,
    spawner: &W,
    clock: &C,
    session_id: &SessionId,
    poll: Duration,
    shutdown: &Shutdown,
) -> Result<WatcherExit, EngineError>
where
    M: MuxAdapter,
    S: KvStore,
    W: WorkerSpawner,
    C: Clock,
{
    let mut strikes: u8 = 0;

    tracing::info!(session_id = %session_id, poll_ms = poll.as_millis() as u64, "crash watcher started");

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                tracing::info!(session_id = %session_id, "watcher shutting down");
                return Ok(WatcherExit::Signalled);
            }
            _ = tokio::time::sleep(poll) => {}
        }

        // Reload each tick: restarts and external edits both mutate state.
        let state = match store.get_session_state(session_id).await {
            Ok(Some(state)) => state,
            Ok(None) => {
                tracing::info!(session_id = %session_id, "session state gone, watcher stopping");
                return Ok(WatcherExit::StateGone);
            }
            Err(e) => {
                tracing::warn!(session_id = %session_id, error = %e, "state read failed, retrying");
                continue;
            }
        };

        let Some(reason) = check_crashed(mux, &state).await else {
            strikes = 0;
            continue;
        };

        strikes += 1;
        tracing::debug!(session_id = %session_id, strikes, reason = %reason, "crash suspected");
        if strikes < DEBOUNCE_STRIKES {
            continue;
        }
        strikes = 0;

        let exhausted = state.budget_exhausted();
        let event = CrashEvent {
            session_id: session_id.clone(),
            timestamp: clock.now_ms(),
            reason: reason.clone(),
            will_restart: !exhausted,
        };
        if let Err(e) = store.record_crash_event(&event).await {
            tracing::warn!(session_id = %session_id, error = %e, "crash event write failed");
        }

        if exhausted {
            tracing::warn!(
                session_id = %session_id,
                restarts = state.restart_count,
                "restart budget exhausted, releasing session"
            );
            store.delete_session_state(session_id).await?;
            return Ok(WatcherExit::BudgetExhausted);
        }

        tracing::warn!(session_id = %session_id, reason = %reason, "crash confirmed, restarting");

        // Clear any half-dead window before rebuilding.
        if let Err(e) = mux.kill(session_id).await {
            tracing::debug!(session_id = %session_id, error = %e, "pre-restart kill failed");
        }
        tokio::time::sleep(RESTART_PAUSE).await;

        let mut state = state;
        state.record_restart(clock.now_ms());
        store.put_session_state(&state).await?;

        match relaunch(mux, spawner, &state).await {
            Ok(_) => {
                tracing::info!(
                    session_id = %session_id,
                    restart = state.restart_count,
                    "session restarted"
                );
            }
            Err(e) => {
                // The next tick will observe the missing session and spend
                // another restart from the budget.
                tracing::warn!(session_id = %session_id, error = %e, "restart failed");
            }
        }
    }
}

#[cfg(test)]
#[path = "watcher_tests.rs"]
mod tests;
