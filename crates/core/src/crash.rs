// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Crash events recorded by the crash watcher.
//!
//! Write-only from the core's point of view: dashboards and humans read
//! them, nothing in the orchestrator does.

use crate::SessionId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrashEvent {
    pub session_id: SessionId,
    pub timestamp: u64,
    pub reason: String,
    pub will_restart: bool,
}

#[cfg(test)]
#[path = "crash_tests.rs"]
mod tests;
