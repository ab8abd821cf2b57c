// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persistent per-session launch state.
//!
//! Written by the supervisor when crash-restart is requested; from then on
//! the crash watcher is the only writer. Deleted when the restart budget is
//! exhausted.

use crate::{SessionId, Tool};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default restart budget for crash-restarted sessions.
pub const DEFAULT_MAX_RESTARTS: u32 = 3;

/// Everything needed to rebuild a session after a crash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub session_id: SessionId,
    pub name: String,
    pub tool: Tool,

    pub task: String,
    pub cwd: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Alternate tool-backend override: inject the backend base URL and
    /// auth token into the tool's environment at launch.
    #[serde(default)]
    pub alt_backend: bool,

    pub heartbeat: bool,
    pub restart_on_crash: bool,
    pub max_restarts: u32,

    #[serde(default)]
    pub restart_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_restart_at: Option<u64>,
    pub created_at: u64,
}

impl SessionState {
    /// Whether the restart budget is used up.
    pub fn budget_exhausted(&self) -> bool {
        self.restart_count >= self.max_restarts
    }

    /// Record one restart at `now_ms`. Count is monotonically non-decreasing.
    pub fn record_restart(&mut self, now_ms: u64) {
        self.restart_count = self.restart_count.saturating_add(1);
        self.last_restart_at = Some(now_ms);
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
