// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    fresh          = { 0, HealthStatus::Healthy },
    almost_stale   = { 59, HealthStatus::Healthy },
    stale_boundary = { 60, HealthStatus::Stale },
    mid_stale      = { 299, HealthStatus::Stale },
    dead_boundary  = { 300, HealthStatus::Dead },
    long_dead      = { 3600, HealthStatus::Dead },
)]
fn classify_boundaries(age_secs: u64, expected: HealthStatus) {
    assert_eq!(
        classify_heartbeat_age(Duration::from_secs(age_secs)),
        expected
    );
}

#[test]
fn sub_second_boundary_is_exact() {
    assert_eq!(
        classify_heartbeat_age(Duration::from_millis(59_999)),
        HealthStatus::Healthy
    );
    assert_eq!(
        classify_heartbeat_age(Duration::from_millis(60_000)),
        HealthStatus::Stale
    );
}

#[test]
fn summary_counts_statuses() {
    let result = |status| HealthCheckResult {
        session_id: SessionId::new("coder-claude-x"),
        timestamp: 0,
        tmux_alive: true,
        process_running: true,
        heartbeat_age_ms: None,
        output_hash: None,
        previous_output_hash: None,
        output_stale_for_ms: 0,
        status,
        message: String::new(),
    };
    let summary = HealthCheckSummary::from_results(
        7,
        vec![
            result(HealthStatus::Healthy),
            result(HealthStatus::Healthy),
            result(HealthStatus::Stuck),
            result(HealthStatus::Dead),
            result(HealthStatus::Unresponsive),
        ],
    );
    assert_eq!(summary.timestamp, 7);
    assert_eq!(summary.healthy, 2);
    assert_eq!(summary.stuck, 1);
    assert_eq!(summary.dead, 1);
    assert_eq!(summary.unresponsive, 1);
    assert_eq!(summary.stale, 0);
    assert_eq!(summary.results.len(), 5);
}

#[test]
fn status_serializes_lowercase() {
    assert_eq!(
        serde_json::to_string(&HealthStatus::Unresponsive).unwrap(),
        "\"unresponsive\""
    );
}
