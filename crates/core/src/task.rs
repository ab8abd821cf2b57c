// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Normalized task model shared by every task source.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Normalized task status. Unknown source statuses map to `Open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Open,
    InProgress,
    Completed,
    Blocked,
    Cancelled,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskStatus::Open => "open",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Blocked => "blocked",
            TaskStatus::Cancelled => "cancelled",
        };
        write!(f, "{}", s)
    }
}

/// Clamp a source-native priority into the normalized 0..=4 range.
pub fn clamp_priority(raw: i64) -> u8 {
    raw.clamp(0, 4) as u8
}

/// A task as seen by the loop, regardless of where it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Stable id, unique across sources (sources prefix their own ids).
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: TaskStatus,
    /// 0 (highest) ..= 4 (lowest).
    pub priority: u8,
    /// Source-type tag, matches the owning source's `info().kind`.
    pub source: String,
    /// Id inside the origin source.
    pub origin_id: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    /// Ids of tasks this one is waiting on.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocked_by: Vec<String>,
    /// Ids of tasks waiting on this one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<String>,
}

impl Task {
    /// A task is ready when nothing blocks it.
    pub fn is_ready(&self) -> bool {
        self.blocked_by.is_empty()
    }
}

/// A partial update applied through `TaskSource::update`.
#[derive(Debug, Clone, Default)]
pub struct TaskChange {
    pub status: Option<TaskStatus>,
    pub assignee: Option<String>,
    pub add_labels: Vec<String>,
    pub comment: Option<String>,
}

/// Post-filter applied by the aggregator after per-source listing.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Keep only these statuses (empty = all).
    pub statuses: Vec<TaskStatus>,
    /// Keep only these priorities (empty = all).
    pub priorities: Vec<u8>,
    pub assignee: Option<String>,
    /// Task must carry every one of these labels.
    pub labels: Vec<String>,
    /// Truncate the combined result.
    pub limit: Option<usize>,
    /// Exclude tasks with a non-empty blocked-by set.
    pub only_ready: bool,
}

impl TaskFilter {
    /// Whether a task passes everything except the limit.
    pub fn matches(&self, task: &Task) -> bool {
        if !self.statuses.is_empty() && !self.statuses.contains(&task.status) {
            return false;
        }
        if !self.priorities.is_empty() && !self.priorities.contains(&task.priority) {
            return false;
        }
        if let Some(ref assignee) = self.assignee {
            if task.assignee.as_deref() != Some(assignee.as_str()) {
                return false;
            }
        }
        if !self.labels.iter().all(|l| task.labels.contains(l)) {
            return false;
        }
        if self.only_ready && !task.is_ready() {
            return false;
        }
        true
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
