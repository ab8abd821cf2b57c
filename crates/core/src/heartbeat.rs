// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Liveness records published by per-session heartbeat emitters.

use crate::SessionId;
use serde::{Deserialize, Serialize};

/// Usage figures scraped from the tool's pane output.
///
/// Every field is optional; a sample with no fields set is dropped before
/// publishing so consumers can tell "no data" from "zero".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageSample {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_calls: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_pct: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week_pct: Option<u8>,
}

impl UsageSample {
    pub fn is_empty(&self) -> bool {
        self.cost.is_none()
            && self.tokens.is_none()
            && self.api_calls.is_none()
            && self.session_pct.is_none()
            && self.week_pct.is_none()
    }
}

/// One heartbeat tick for a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Heartbeat {
    pub pane_id: String,
    pub session_id: SessionId,
    /// Epoch milliseconds at publish time.
    pub timestamp: u64,
    /// Literal "running"; kept as a field for forward compatibility.
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_session: Option<SessionId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<UsageSample>,
}

impl Heartbeat {
    pub fn running(session_id: SessionId, timestamp: u64) -> Self {
        Self {
            pane_id: session_id.to_string(),
            session_id,
            timestamp,
            status: "running".to_string(),
            task: None,
            parent_session: None,
            usage: None,
        }
    }
}

#[cfg(test)]
#[path = "heartbeat_tests.rs"]
mod tests;
