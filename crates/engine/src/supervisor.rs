// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session supervisor.
//!
//! Builds the tool command, writes the prompt file, launches the detached
//! session, waits for the tool process to appear, and forks the heartbeat
//! emitter and crash watcher. The supervisor exits after launching; the
//! workers survive it and coordinate through the store alone.

use crate::command::{build_tool_command, BackendOverride};
use crate::detach::WorkerSpawner;
use crate::error::EngineError;
use crate::prompt::{build_prompt, write_prompt_file};
use coders_adapters::subprocess::{run_with_timeout, PS_TIMEOUT};
use coders_adapters::MuxAdapter;
use coders_core::{Clock, SessionId, SessionState, Tool, DEFAULT_MAX_RESTARTS};
use coders_store::{KvStore, RecordsExt};
use std::path::PathBuf;
use std::time::Duration;

/// Poll step while waiting for the tool process.
const READY_POLL: Duration = Duration::from_millis(500);

/// Everything a launch needs.
#[derive(Debug, Clone)]
pub struct LaunchRequest {
    pub tool: Tool,
    pub task: String,
    pub cwd: PathBuf,
    pub model: Option<String>,
    pub heartbeat: bool,
    pub restart_on_crash: bool,
    pub max_restarts: u32,
    pub backend: Option<BackendOverride>,
    /// Pin the session id instead of deriving it from the task. The task
    /// loop uses this so its promise key always matches the session.
    pub session_id: Option<SessionId>,
}

impl LaunchRequest {
    pub fn new(tool: Tool, task: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            tool,
            task: task.into(),
            cwd: cwd.into(),
            model: None,
            heartbeat: true,
            restart_on_crash: false,
            max_restarts: DEFAULT_MAX_RESTARTS,
            backend: None,
            session_id: None,
        }
    }
}

/// What a launch produced.
#[derive(Debug)]
pub struct LaunchReport {
    pub session_id: SessionId,
    /// Whether the tool process was observed before the readiness budget
    /// ran out. `false` is a warning, never an error.
    pub ready: bool,
    /// Downgraded failures (readiness, worker forks, store degradation).
    pub warnings: Vec<String>,
}

/// Resolve a working directory: absolute, then relative to the current
/// directory, then a zoxide query if installed.
pub async fn resolve_cwd(raw: &str) -> Result<PathBuf, EngineError> {
    let candidate = PathBuf::from(raw);
    if candidate.is_absolute() && candidate.is_dir() {
        return Ok(candidate);
    }

    if let Ok(current) = std::env::current_dir() {
        let joined = current.join(&candidate);
        if joined.is_dir() {
            return Ok(joined);
        }
    }

    // Fall back to the operator's recently-visited directories
    let mut cmd = tokio::process::Command::new("zoxide");
    cmd.args(["query", raw]);
    if let Ok(output) = run_with_timeout(cmd, PS_TIMEOUT, "zoxide query").await {
        if output.status.success() {
            let path = PathBuf::from(String::from_utf8_lossy(&output.stdout).trim());
            if path.is_dir() {
                return Ok(path);
            }
        }
    }

    Err(EngineError::DirectoryNotFound(raw.to_string()))
}

/// Wait for a pane descendant matching the tool's process patterns.
pub async fn wait_for_tool<M: MuxAdapter>(
    mux: &M,
    session_id: &SessionId,
    tool: Tool,
    timeout: Duration,
) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        match mux
            .tool_process_running(session_id, tool.process_patterns())
            .await
        {
            Ok(true) => return true,
            Ok(false) => {}
            Err(e) => {
                tracing::debug!(session_id = %session_id, error = %e, "readiness probe failed");
            }
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(READY_POLL).await;
    }
}

/// Launch a new session.
///
/// `store` is optional: with the store unreachable the session still
/// launches, it just runs without crash-restart state (a warning records
/// the degradation).
pub async fn launch<M, S, W, C>(
    mux: &M,
    store: Option<&S>,
    spawner: &W,
    clock: &C,
    req: &LaunchRequest,
) -> Result<LaunchReport, EngineError>
where
    M: MuxAdapter,
    S: KvStore,
    W: WorkerSpawner,
    C: Clock,
{
    let session_id = match &req.session_id {
        Some(id) => id.clone(),
        None => SessionId::for_task(req.tool, &req.task, clock.now_secs()),
    };

    if mux.session_exists(&session_id).await? {
        return Err(EngineError::SessionConflict(session_id.to_string()));
    }
    if !req.cwd.is_dir() {
        return Err(EngineError::DirectoryNotFound(req.cwd.display().to_string()));
    }

    let mut warnings = Vec::new();

    start_session(mux, &session_id, req, None).await?;

    let ready = wait_for_tool(mux, &session_id, req.tool, crate::env::ready_timeout()).await;
    if !ready {
        let warning = format!(
            "{} process not observed in session {} within the readiness budget; the session keeps running",
            req.tool, session_id
        );
        tracing::warn!(session_id = %session_id, "{}", warning);
        warnings.push(warning);
    }

    if req.heartbeat {
        if store.is_none() {
            warnings.push("store unavailable: heartbeat disabled".to_string());
        } else if let Err(e) = spawner.spawn_heartbeat(&session_id) {
            warnings.push(format!("heartbeat emitter not started: {}", e));
        }
    }

    // Persist state before forking the watcher so it always finds its config.
    if req.restart_on_crash {
        match store {
            Some(store) => {
                let state = session_state_for(&session_id, req, clock.now_ms());
                store.put_session_state(&state).await?;
                if let Err(e) = spawner.spawn_watcher(&session_id) {
                    warnings.push(format!("crash watcher not started: {}", e));
                }
            }
            None => {
                warnings.push("store unavailable: session runs without crash-restart".to_string());
            }
        }
    }

    for warning in &warnings {
        tracing::warn!(session_id = %session_id, "{}", warning);
    }

    Ok(LaunchReport {
        session_id,
        ready,
        warnings,
    })
}

/// Rebuild a crashed session from its preserved state. Used by the crash
/// watcher; the restart counter must already be bumped on `state`.
pub async fn relaunch<M, W>(
    mux: &M,
    spawner: &W,
    state: &SessionState,
) -> Result<bool, EngineError>
where
    M: MuxAdapter,
    W: WorkerSpawner,
{
    let req = LaunchRequest {
        tool: state.tool,
        task: state.task.clone(),
        cwd: state.cwd.clone(),
        model: state.model.clone(),
        heartbeat: state.heartbeat,
        restart_on_crash: state.restart_on_crash,
        max_restarts: state.max_restarts,
        backend: backend_from_env(state.alt_backend),
        session_id: Some(state.session_id.clone()),
    };

    start_session(mux, &state.session_id, &req, Some(state.restart_count)).await?;

    let ready = wait_for_tool(
        mux,
        &state.session_id,
        state.tool,
        crate::env::ready_timeout(),
    )
    .await;
    if !ready {
        tracing::warn!(session_id = %state.session_id, "tool not observed after restart");
    }

    if state.heartbeat {
        if let Err(e) = spawner.spawn_heartbeat(&state.session_id) {
            tracing::warn!(session_id = %state.session_id, error = %e, "heartbeat emitter not restarted");
        }
    }

    Ok(ready)
}

/// Shared launch core: prompt, command line, detached session.
async fn start_session<M: MuxAdapter>(
    mux: &M,
    session_id: &SessionId,
    req: &LaunchRequest,
    restart_number: Option<u32>,
) -> Result<(), EngineError> {
    let prompt = build_prompt(req.tool, &req.task, restart_number);

    let prompt_file = if req.tool.reads_prompt_from_stdin() {
        Some(write_prompt_file(session_id, &prompt)?)
    } else {
        None
    };

    let command_line = build_tool_command(
        req.tool,
        session_id,
        req.model.as_deref(),
        &prompt,
        prompt_file.as_deref(),
        req.backend.as_ref(),
    );

    mux.create_detached(session_id, &req.cwd, &command_line)
        .await?;

    tracing::info!(
        session_id = %session_id,
        tool = %req.tool,
        cwd = %req.cwd.display(),
        restart = restart_number.unwrap_or(0),
        "session launched"
    );
    Ok(())
}

/// Backend override from the environment when the alternate-backend flag
/// was set at spawn time.
pub fn backend_from_env(alt_backend: bool) -> Option<BackendOverride> {
    if !alt_backend {
        return None;
    }
    match (crate::env::backend_url(), crate::env::backend_token()) {
        (Some(base_url), Some(auth_token)) => Some(BackendOverride {
            base_url,
            auth_token,
        }),
        _ => {
            tracing::warn!("alternate backend requested but CODERS_BACKEND_URL/TOKEN not set");
            None
        }
    }
}

fn session_state_for(session_id: &SessionId, req: &LaunchRequest, now_ms: u64) -> SessionState {
    SessionState {
        session_id: session_id.clone(),
        name: session_id
            .as_str()
            .trim_start_matches(coders_core::SESSION_PREFIX)
            .to_string(),
        tool: req.tool,
        task: req.task.clone(),
        cwd: req.cwd.clone(),
        model: req.model.clone(),
        alt_backend: req.backend.is_some(),
        heartbeat: req.heartbeat,
        restart_on_crash: req.restart_on_crash,
        max_restarts: req.max_restarts,
        restart_count: 0,
        last_restart_at: None,
        created_at: now_ms,
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
