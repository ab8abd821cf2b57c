// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task-loop progress records.

use crate::Tool;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for one task-loop execution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoopId(pub String);

impl LoopId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LoopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for LoopId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for LoopId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Where the loop is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopStatus {
    Running,
    Completed,
    Paused,
    Failed,
    Blocked,
}

impl fmt::Display for LoopStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LoopStatus::Running => "running",
            LoopStatus::Completed => "completed",
            LoopStatus::Paused => "paused",
            LoopStatus::Failed => "failed",
            LoopStatus::Blocked => "blocked",
        };
        write!(f, "{}", s)
    }
}

/// Progress record persisted once per loop iteration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopState {
    pub loop_id: LoopId,
    /// Index of the task currently (or last) being worked, 0-based while
    /// running; equals `total_tasks` once every task has been dispatched.
    pub current_task_index: usize,
    pub total_tasks: usize,
    pub current_tool: Tool,
    pub status: LoopStatus,
    #[serde(default)]
    pub completed_count: usize,
    pub updated_at: u64,
}

/// Published when a loop reaches a terminal state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopNotification {
    pub loop_id: LoopId,
    pub timestamp: u64,
    pub task_count: usize,
    pub status: LoopStatus,
    pub message: String,
}

#[cfg(test)]
#[path = "loop_state_tests.rs"]
mod tests;
