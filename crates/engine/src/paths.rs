// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! State-directory layout.
//!
//! Prompt files and detached-worker logs live under one per-user state
//! directory: `$CODERS_STATE_DIR`, or the platform state dir, or
//! `~/.local/state/coders`.

use coders_core::SessionId;
use std::io;
use std::path::{Path, PathBuf};

/// Resolve the state directory without creating it.
pub fn state_dir() -> PathBuf {
    if let Some(dir) = crate::env::state_dir() {
        return PathBuf::from(dir);
    }
    if let Some(dir) = dirs::state_dir() {
        return dir.join("coders");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".local/state/coders")
}

/// Directory for generated prompt files.
pub fn prompts_dir() -> PathBuf {
    state_dir().join("prompts")
}

/// Directory for detached-worker log files.
pub fn logs_dir() -> PathBuf {
    state_dir().join("logs")
}

/// Prompt file path for a session.
pub fn prompt_file(session_id: &SessionId) -> PathBuf {
    prompts_dir().join(format!("{}.txt", session_id))
}

/// Log file for a session's detached worker (`heartbeat`, `watch`, `loop`).
pub fn worker_log(session_id: &SessionId, worker: &str) -> PathBuf {
    logs_dir().join(format!("{}.{}.log", session_id, worker))
}

/// Ensure a directory exists.
pub fn ensure_dir(dir: &Path) -> io::Result<()> {
    std::fs::create_dir_all(dir)
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
