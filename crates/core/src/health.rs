// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Health classification for sessions.

use crate::SessionId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Heartbeat older than this is stale.
pub const HEARTBEAT_STALE_AFTER: Duration = Duration::from_secs(60);

/// Heartbeat older than this is dead.
pub const HEARTBEAT_DEAD_AFTER: Duration = Duration::from_secs(300);

/// Unchanged pane output for longer than this upgrades healthy to stuck.
pub const OUTPUT_STUCK_AFTER: Duration = Duration::from_secs(300);

/// Session health classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Stale,
    Dead,
    Stuck,
    Unresponsive,
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Stale => "stale",
            HealthStatus::Dead => "dead",
            HealthStatus::Stuck => "stuck",
            HealthStatus::Unresponsive => "unresponsive",
        };
        write!(f, "{}", s)
    }
}

/// Classify a heartbeat by age. Boundaries are inclusive on the lower side:
/// 60 s is already stale and 300 s is already dead.
pub fn classify_heartbeat_age(age: Duration) -> HealthStatus {
    if age < HEARTBEAT_STALE_AFTER {
        HealthStatus::Healthy
    } else if age < HEARTBEAT_DEAD_AFTER {
        HealthStatus::Stale
    } else {
        HealthStatus::Dead
    }
}

/// Per-session result written under `coders:health:<session>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResult {
    pub session_id: SessionId,
    pub timestamp: u64,
    pub tmux_alive: bool,
    pub process_running: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heartbeat_age_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_output_hash: Option<String>,
    /// How long the pane content hash has been unchanged.
    #[serde(default)]
    pub output_stale_for_ms: u64,
    pub status: HealthStatus,
    pub message: String,
}

/// Aggregate written under `coders:health:summary`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthCheckSummary {
    pub timestamp: u64,
    pub healthy: usize,
    pub stale: usize,
    pub dead: usize,
    pub stuck: usize,
    pub unresponsive: usize,
    pub results: Vec<HealthCheckResult>,
}

impl HealthCheckSummary {
    /// Build the summary from per-session results at `now_ms`.
    pub fn from_results(now_ms: u64, results: Vec<HealthCheckResult>) -> Self {
        let mut summary = Self {
            timestamp: now_ms,
            results: Vec::new(),
            ..Default::default()
        };
        for result in &results {
            match result.status {
                HealthStatus::Healthy => summary.healthy += 1,
                HealthStatus::Stale => summary.stale += 1,
                HealthStatus::Dead => summary.dead += 1,
                HealthStatus::Stuck => summary.stuck += 1,
                HealthStatus::Unresponsive => summary.unresponsive += 1,
            }
        }
        summary.results = results;
        summary
    }
}

#[cfg(test)]
#[path = "health_tests.rs"]
mod tests;
