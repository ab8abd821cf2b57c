// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the engine.
//!
//! Configuration is process-wide and read-only after startup; every knob
//! has a default so a bare environment works.

use std::time::Duration;

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

fn parse_duration_secs(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
}

/// KV store URL (default: local redis).
pub fn redis_url() -> String {
    std::env::var("CODERS_REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379/".to_string())
}

/// Heartbeat publish interval (default: 30s).
pub fn heartbeat_interval() -> Duration {
    parse_duration_secs("CODERS_HEARTBEAT_INTERVAL_SECS").unwrap_or(Duration::from_secs(30))
}

/// Crash watcher poll interval (default: 5000ms).
pub fn watcher_poll() -> Duration {
    parse_duration_ms("CODERS_WATCHER_POLL_MS").unwrap_or(Duration::from_secs(5))
}

/// Health checker watch interval (default: 30s).
pub fn health_interval() -> Duration {
    parse_duration_secs("CODERS_HEALTH_INTERVAL_SECS").unwrap_or(Duration::from_secs(30))
}

/// Promise poll interval for the task loop (default: 5000ms).
pub fn promise_poll() -> Duration {
    parse_duration_ms("CODERS_PROMISE_POLL_MS").unwrap_or(Duration::from_secs(5))
}

/// Pause between loop tasks (default: 2s).
pub fn inter_task_delay() -> Duration {
    parse_duration_ms("CODERS_TASK_DELAY_MS").unwrap_or(Duration::from_secs(2))
}

/// Tool readiness budget after spawn (default: 30s).
pub fn ready_timeout() -> Duration {
    parse_duration_ms("CODERS_READY_TIMEOUT_MS").unwrap_or(Duration::from_secs(30))
}

/// Alternate tool-backend base URL, when the operator opts in at spawn.
pub fn backend_url() -> Option<String> {
    std::env::var("CODERS_BACKEND_URL").ok().filter(|s| !s.is_empty())
}

/// Alternate tool-backend auth token.
pub fn backend_token() -> Option<String> {
    std::env::var("CODERS_BACKEND_TOKEN").ok().filter(|s| !s.is_empty())
}

/// Session id handed to the assistant inside a session.
pub fn session_id() -> Option<String> {
    std::env::var("CODERS_SESSION_ID").ok().filter(|s| !s.is_empty())
}

/// State directory override.
pub fn state_dir() -> Option<String> {
    std::env::var("CODERS_STATE_DIR").ok().filter(|s| !s.is_empty())
}
