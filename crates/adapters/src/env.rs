// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the adapters crate.

use std::time::Duration;

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Multiplexer command timeout (default: 10000ms).
pub fn mux_timeout() -> Duration {
    parse_duration_ms("CODERS_MUX_TIMEOUT_MS").unwrap_or(crate::subprocess::MUX_TIMEOUT)
}
