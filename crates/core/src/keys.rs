// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! KV-store key namespace and TTL policy.
//!
//! Every record lives under the `coders:` prefix; each key has exactly one
//! writer component. TTLs are centralized here so writers cannot drift.

use crate::{LoopId, SessionId};
use std::time::Duration;

/// TTL for heartbeat records.
pub const HEARTBEAT_TTL: Duration = Duration::from_secs(600);

/// TTL for per-session health results.
pub const HEALTH_TTL: Duration = Duration::from_secs(600);

/// TTL for the health summary.
pub const HEALTH_SUMMARY_TTL: Duration = Duration::from_secs(300);

/// TTL for loop state and notifications.
pub const LOOP_TTL: Duration = Duration::from_secs(7 * 24 * 3600);

/// TTL for crash events.
pub const CRASH_TTL: Duration = Duration::from_secs(7 * 24 * 3600);

/// Key of the health summary record.
pub const HEALTH_SUMMARY_KEY: &str = "coders:health:summary";

pub fn session_state(id: &SessionId) -> String {
    format!("coders:session:{}", id)
}

pub fn heartbeat(id: &SessionId) -> String {
    format!("coders:pane:{}", id)
}

pub fn promise(id: &SessionId) -> String {
    format!("coders:promise:{}", id)
}

pub fn health(id: &SessionId) -> String {
    format!("coders:health:{}", id)
}

pub fn crash_event(id: &SessionId, timestamp_ms: u64) -> String {
    format!("coders:crash:{}:{}", id, timestamp_ms)
}

pub fn loop_state(id: &LoopId) -> String {
    format!("coders:loop:state:{}", id)
}

pub fn loop_notification(id: &LoopId, timestamp_ms: u64) -> String {
    format!("coders:loop:notify:{}:{}", id, timestamp_ms)
}

/// Scan pattern matching every session-state key.
pub const SESSION_STATE_SCAN: &str = "coders:session:*";

/// Scan pattern matching every promise key.
pub const PROMISE_SCAN: &str = "coders:promise:*";

/// Extract the session id from a `coders:session:<id>` key.
pub fn session_id_from_state_key(key: &str) -> Option<SessionId> {
    key.strip_prefix("coders:session:")
        .map(|id| SessionId::new(id))
}

#[cfg(test)]
#[path = "keys_tests.rs"]
mod tests;
