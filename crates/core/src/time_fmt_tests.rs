// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    zero          = { 0, "0s" },
    seconds       = { 59, "59s" },
    exact_minute  = { 120, "2m" },
    minute_second = { 301, "5m1s" },
    exact_hour    = { 7200, "2h" },
    hour_minute   = { 5400, "1h30m" },
    days          = { 259200, "3d" },
)]
fn formats(secs: u64, expected: &str) {
    assert_eq!(format_elapsed(secs), expected);
}

#[test]
fn ms_wrapper_truncates() {
    assert_eq!(format_elapsed_ms(301_900), "5m1s");
}
