// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

#[test]
#[serial]
fn env_override_wins() {
    std::env::set_var("CODERS_STATE_DIR", "/tmp/coders-test-state");
    assert_eq!(state_dir(), PathBuf::from("/tmp/coders-test-state"));
    assert_eq!(
        prompt_file(&SessionId::new("coder-claude-x")),
        PathBuf::from("/tmp/coders-test-state/prompts/coder-claude-x.txt")
    );
    assert_eq!(
        worker_log(&SessionId::new("coder-claude-x"), "heartbeat"),
        PathBuf::from("/tmp/coders-test-state/logs/coder-claude-x.heartbeat.log")
    );
    std::env::remove_var("CODERS_STATE_DIR");
}

#[test]
#[serial]
fn default_is_under_home_or_state() {
    std::env::remove_var("CODERS_STATE_DIR");
    let dir = state_dir();
    assert!(dir.to_string_lossy().contains("coders"));
}
