// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    enter     = { "Enter" },
    tab       = { "Tab" },
    escape    = { "Escape" },
    up        = { "Up" },
    page_down = { "PageDown" },
    f1        = { "F1" },
    f12       = { "F12" },
    ctrl_c    = { "C-c" },
    ctrl_z    = { "C-z" },
)]
fn whitelisted_keys(name: &str) {
    assert!(is_valid_key(name));
}

#[yare::parameterized(
    empty        = { "" },
    lowercase    = { "enter" },
    f0           = { "F0" },
    f13          = { "F13" },
    ctrl_upper   = { "C-A" },
    ctrl_word    = { "C-ab" },
    arbitrary    = { "Meta-x" },
    literal_text = { "ls -la" },
)]
fn rejected_keys(name: &str) {
    assert!(!is_valid_key(name));
}
