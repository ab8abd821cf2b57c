// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Detached worker processes.
//!
//! The heartbeat emitter and crash watcher outlive the process that spawned
//! them: they are re-execs of the current binary with hidden subcommands,
//! placed in their own process group with stdio pointed at per-session log
//! files. The spawner is a trait so engine logic is testable without
//! forking real processes.

use crate::error::EngineError;
use coders_core::SessionId;
use std::os::unix::process::CommandExt;
use std::path::Path;
use std::process::{Command, Stdio};

/// Spawns detached worker processes for a session.
pub trait WorkerSpawner: Clone + Send + Sync + 'static {
    fn spawn_heartbeat(&self, session_id: &SessionId) -> Result<(), EngineError>;

    fn spawn_watcher(&self, session_id: &SessionId) -> Result<(), EngineError>;
}

/// Re-exec the current binary with `args`, detached, logging to `log_path`.
///
/// Returns the child pid. The child is in a new process group so it
/// survives the parent's exit and terminal signals.
pub fn spawn_detached(args: &[String], log_path: &Path) -> std::io::Result<u32> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let log = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;
    let log_err = log.try_clone()?;

    let exe = std::env::current_exe()?;
    let child = Command::new(exe)
        .args(args)
        .stdin(Stdio::null())
        .stdout(log)
        .stderr(log_err)
        .process_group(0)
        .spawn()?;

    Ok(child.id())
}

/// Production spawner: re-execs the current binary.
#[derive(Clone, Copy, Default)]
pub struct ExecSpawner;

impl ExecSpawner {
    pub fn new() -> Self {
        Self
    }

    fn spawn_worker(&self, subcommand: &str, session_id: &SessionId) -> Result<(), EngineError> {
        let args = vec![
            subcommand.to_string(),
            "--session".to_string(),
            session_id.to_string(),
        ];
        let log_path = crate::paths::worker_log(session_id, subcommand);
        let pid = spawn_detached(&args, &log_path)?;
        tracing::info!(session_id = %session_id, pid, worker = subcommand, "spawned detached worker");
        Ok(())
    }
}

impl WorkerSpawner for ExecSpawner {
    fn spawn_heartbeat(&self, session_id: &SessionId) -> Result<(), EngineError> {
        self.spawn_worker("heartbeat", session_id)
    }

    fn spawn_watcher(&self, session_id: &SessionId) -> Result<(), EngineError> {
        self.spawn_worker("watch", session_id)
    }
}

/// No-op spawner for tests and for contexts that manage their own workers.
#[derive(Clone, Copy, Default)]
pub struct NullSpawner;

impl WorkerSpawner for NullSpawner {
    fn spawn_heartbeat(&self, _session_id: &SessionId) -> Result<(), EngineError> {
        Ok(())
    }

    fn spawn_watcher(&self, _session_id: &SessionId) -> Result<(), EngineError> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "detach_tests.rs"]
mod tests;
