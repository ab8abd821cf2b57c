// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Promise-gated task loop.
//!
//! Pulls tasks from the aggregated sources, spawns one session per task,
//! blocks until the session publishes its promise, marks the task in its
//! source, and moves on. Strictly sequential: one task at a time.

use crate::detach::WorkerSpawner;
use crate::error::EngineError;
use crate::shutdown::Shutdown;
use crate::supervisor::{launch, LaunchRequest};
use coders_adapters::{MuxAdapter, NotifyAdapter};
use coders_core::{
    Clock, LoopId, LoopNotification, LoopState, LoopStatus, PromiseStatus, SessionId, Task,
    TaskFilter, TaskStatus, Tool,
};
use coders_sources::MultiSource;
use coders_store::{KvStore, RecordsExt};
use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;

/// Pane tail inspected for quota warnings after each task.
const QUOTA_TAIL_LINES: u32 = 100;

// Allow expect here as the regexes are compile-time verified to be valid
#[allow(clippy::expect_used)]
static QUOTA_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)approaching.*usage.limit",
        r"(?i)9[0-9]%.*limit",
        r"(?i)usage.*limit.*reached",
        r"(?i)exceeded.*limit",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("constant regex pattern is valid"))
    .collect()
});

/// Whether the pane tail carries a per-tool quota warning.
pub fn quota_warning(tail: &str) -> bool {
    QUOTA_PATTERNS.iter().any(|re| re.is_match(tail))
}

/// Loop inputs, fixed for the lifetime of one run.
#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub loop_id: LoopId,
    pub cwd: PathBuf,
    pub tool: Tool,
    pub model: Option<String>,
    pub stop_on_blocked: bool,
    pub only_ready: bool,
    /// Tool to switch to when the current tool hits its usage quota.
    /// `None` disables the switch. The switch is one-way for the rest of
    /// the loop.
    pub quota_fallback: Option<Tool>,
    pub promise_poll: Duration,
    pub inter_task_delay: Duration,
}

impl LoopConfig {
    pub fn new(loop_id: LoopId, cwd: impl Into<PathBuf>, tool: Tool) -> Self {
        Self {
            loop_id,
            cwd: cwd.into(),
            tool,
            model: None,
            stop_on_blocked: false,
            only_ready: false,
            quota_fallback: Some(Tool::Codex),
            promise_poll: crate::env::promise_poll(),
            inter_task_delay: crate::env::inter_task_delay(),
        }
    }
}

/// Terminal report of one loop run.
#[derive(Debug)]
pub struct LoopReport {
    pub status: LoopStatus,
    pub total_tasks: usize,
    pub completed: usize,
}

enum Gate {
    Promise(coders_core::Promise),
    Cancelled,
}

/// Wait for the session's promise, polling the store.
async fn await_promise<S: KvStore>(
    store: &S,
    session_id: &SessionId,
    poll: Duration,
    shutdown: &Shutdown,
) -> Result<Gate, EngineError> {
    loop {
        match store.get_promise(session_id).await {
            Ok(Some(promise)) => return Ok(Gate::Promise(promise)),
            Ok(None) => {}
            // Transient: the store may come back on the next poll
            Err(e) => tracing::warn!(session_id = %session_id, error = %e, "promise poll failed"),
        }

        tokio::select! {
            _ = shutdown.cancelled() => return Ok(Gate::Cancelled),
            _ = tokio::time::sleep(poll) => {}
        }
    }
}

/// Run the loop to a terminal state.
#[allow(clippy::too_many_arguments)]
pub async fn run_task_loop<M, S, W, N, C>(
    mux: &M,
    store: &S,
    spawner: &W,
    notify: &N,
    clock: &C,
    sources: &MultiSource,
    cfg: &LoopConfig,
    shutdown: &Shutdown,
) -> Result<LoopReport, EngineError>
where
    M: MuxAdapter,
    S: KvStore,
    W: WorkerSpawner,
    N: NotifyAdapter,
    C: Clock,
{
    let filter = TaskFilter {
        statuses: vec![TaskStatus::Open, TaskStatus::InProgress],
        only_ready: cfg.only_ready,
        ..Default::default()
    };
    let tasks = sources.list(&filter).await;

    if tasks.is_empty() {
        tracing::info!(loop_id = %cfg.loop_id, "no tasks to run");
        let report = LoopReport {
            status: LoopStatus::Completed,
            total_tasks: 0,
            completed: 0,
        };
        persist_state(store, cfg, 0, 0, cfg.tool, 0, LoopStatus::Completed, clock).await;
        finish(mux, store, notify, clock, cfg, &report, None, "No open tasks").await;
        return Ok(report);
    }

    tracing::info!(loop_id = %cfg.loop_id, count = tasks.len(), "task loop starting");

    let total = tasks.len();
    let mut tool = cfg.tool;
    let mut completed = 0usize;
    let mut last_session: Option<SessionId> = None;

    for (index, task) in tasks.iter().enumerate() {
        persist_state(store, cfg, index, total, tool, completed, LoopStatus::Running, clock).await;

        if shutdown.is_cancelled() {
            let report = LoopReport {
                status: LoopStatus::Paused,
                total_tasks: total,
                completed,
            };
            persist_state(store, cfg, index, total, tool, completed, LoopStatus::Paused, clock).await;
            finish(mux, store, notify, clock, cfg, &report, last_session.as_ref(), "Loop interrupted").await;
            return Ok(report);
        }

        // The promise key must match the session the supervisor creates, so
        // the id is computed here and pinned on the request.
        let session_id = SessionId::for_task(tool, &task.title, clock.now_secs());

        // A leftover promise from a previous run would gate instantly.
        let _ = store.delete_promise(&session_id).await;

        let mut request = LaunchRequest::new(tool, task.title.clone(), cfg.cwd.clone());
        request.model = cfg.model.clone();
        request.session_id = Some(session_id.clone());

        match launch(mux, Some(store), spawner, clock, &request).await {
            Ok(report) => {
                tracing::info!(
                    loop_id = %cfg.loop_id,
                    task = %task.id,
                    session_id = %report.session_id,
                    "task session launched"
                );
            }
            Err(e) => {
                tracing::error!(loop_id = %cfg.loop_id, task = %task.id, error = %e, "task launch failed");
                let report = LoopReport {
                    status: LoopStatus::Failed,
                    total_tasks: total,
                    completed,
                };
                persist_state(store, cfg, index, total, tool, completed, LoopStatus::Failed, clock)
                    .await;
                finish(
                    mux, store, notify, clock, cfg, &report, last_session.as_ref(),
                    &format!("Launch failed for task {}: {}", task.id, e),
                )
                .await;
                return Ok(report);
            }
        }
        last_session = Some(session_id.clone());

        let promise = match await_promise(store, &session_id, cfg.promise_poll, shutdown).await? {
            Gate::Promise(promise) => promise,
            Gate::Cancelled => {
                let report = LoopReport {
                    status: LoopStatus::Paused,
                    total_tasks: total,
                    completed,
                };
                persist_state(store, cfg, index, total, tool, completed, LoopStatus::Paused, clock)
                    .await;
                finish(mux, store, notify, clock, cfg, &report, Some(&session_id), "Loop interrupted").await;
                return Ok(report);
            }
        };

        tracing::info!(
            loop_id = %cfg.loop_id,
            task = %task.id,
            status = %promise.status,
            summary = %promise.summary,
            "promise received"
        );

        if promise.status == PromiseStatus::Blocked {
            mark_blocked(sources, task, &promise).await;
            if cfg.stop_on_blocked {
                let report = LoopReport {
                    status: LoopStatus::Blocked,
                    total_tasks: total,
                    completed,
                };
                persist_state(store, cfg, index, total, tool, completed, LoopStatus::Blocked, clock)
                    .await;
                finish(
                    mux, store, notify, clock, cfg, &report, Some(&session_id),
                    &format!("Task {} blocked: {}", task.id, promise.summary),
                )
                .await;
                return Ok(report);
            }
        } else {
            if let Err(e) = sources.mark_complete(task).await {
                tracing::error!(loop_id = %cfg.loop_id, task = %task.id, error = %e, "mark complete failed");
            }
            completed += 1;
        }

        tool = next_tool(mux, &session_id, tool, cfg.quota_fallback).await;

        if index + 1 < total {
            tokio::select! {
                _ = shutdown.cancelled() => {}
                _ = tokio::time::sleep(cfg.inter_task_delay) => {}
            }
        }
    }

    let report = LoopReport {
        status: LoopStatus::Completed,
        total_tasks: total,
        completed,
    };
    persist_state(store, cfg, total, total, tool, completed, LoopStatus::Completed, clock).await;
    finish(
        mux, store, notify, clock, cfg, &report, last_session.as_ref(),
        &format!("Completed {}/{} tasks", completed, total),
    )
    .await;
    Ok(report)
}

/// Quota check on the finished session's pane; decides the tool for the
/// next task. The switch is permanent for the remainder of the loop.
async fn next_tool<M: MuxAdapter>(
    mux: &M,
    session_id: &SessionId,
    current: Tool,
    fallback: Option<Tool>,
) -> Tool {
    let Some(fallback) = fallback else {
        return current;
    };
    if current != Tool::Claude || fallback == current {
        return current;
    }
    match mux.capture_pane(session_id, QUOTA_TAIL_LINES).await {
        Ok(tail) if quota_warning(&tail) => {
            tracing::warn!(
                session_id = %session_id,
                from = %current,
                to = %fallback,
                "usage quota warning detected, switching tool"
            );
            fallback
        }
        _ => current,
    }
}

async fn mark_blocked(sources: &MultiSource, task: &Task, promise: &coders_core::Promise) {
    let reason = if promise.blockers.is_empty() {
        promise.summary.clone()
    } else {
        promise.blockers.join("; ")
    };
    if let Err(e) = sources.mark_blocked(task, &reason).await {
        // Checklist sources reject blocked; surface and continue
        tracing::warn!(task = %task.id, error = %e, "mark blocked failed");
    }
}

#[allow(clippy::too_many_arguments)]
async fn persist_state<S: KvStore, C: Clock>(
    store: &S,
    cfg: &LoopConfig,
    index: usize,
    total: usize,
    tool: Tool,
    completed: usize,
    status: LoopStatus,
    clock: &C,
) {
    let state = LoopState {
        loop_id: cfg.loop_id.clone(),
        current_task_index: index,
        total_tasks: total,
        current_tool: tool,
        status,
        completed_count: completed,
        updated_at: clock.now_ms(),
    };
    if let Err(e) = store.put_loop_state(&state).await {
        tracing::warn!(loop_id = %cfg.loop_id, error = %e, "loop state write failed");
    }
}

/// Terminal bookkeeping: notification record, desktop notification, and a
/// best-effort multiplexer status line.
#[allow(clippy::too_many_arguments)]
async fn finish<M, S, N, C>(
    mux: &M,
    store: &S,
    notify: &N,
    clock: &C,
    cfg: &LoopConfig,
    report: &LoopReport,
    last_session: Option<&SessionId>,
    message: &str,
) where
    M: MuxAdapter,
    S: KvStore,
    N: NotifyAdapter,
    C: Clock,
{
    let notification = LoopNotification {
        loop_id: cfg.loop_id.clone(),
        timestamp: clock.now_ms(),
        task_count: report.total_tasks,
        status: report.status,
        message: message.to_string(),
    };
    if let Err(e) = store.publish_loop_notification(&notification).await {
        tracing::warn!(loop_id = %cfg.loop_id, error = %e, "loop notification write failed");
    }

    if let Err(e) = notify
        .notify(&format!("coders loop {}", report.status), message)
        .await
    {
        tracing::debug!(error = %e, "desktop notification failed");
    }

    if let Some(session_id) = last_session {
        let _ = mux.display_message(session_id, message).await;
    }

    tracing::info!(
        loop_id = %cfg.loop_id,
        status = %report.status,
        completed = report.completed,
        total = report.total_tasks,
        "task loop finished"
    );
}

#[cfg(test)]
#[path = "task_loop_tests.rs"]
mod tests;
