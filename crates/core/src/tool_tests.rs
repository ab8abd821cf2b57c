// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    claude   = { "claude",   Tool::Claude },
    gemini   = { "gemini",   Tool::Gemini },
    codex    = { "codex",    Tool::Codex },
    opencode = { "opencode", Tool::Opencode },
)]
fn parse_known(input: &str, expected: Tool) {
    assert_eq!(input.parse::<Tool>().unwrap(), expected);
}

#[test]
fn parse_unknown_fails() {
    let err = "cursor".parse::<Tool>().unwrap_err();
    assert!(err.to_string().contains("cursor"));
}

#[test]
fn display_round_trips() {
    for tool in Tool::ALL {
        assert_eq!(tool.as_str().parse::<Tool>().unwrap(), tool);
    }
}

#[test]
fn gemini_takes_prompt_via_flag() {
    assert!(!Tool::Gemini.reads_prompt_from_stdin());
    assert!(Tool::Claude.reads_prompt_from_stdin());
    assert!(Tool::Codex.reads_prompt_from_stdin());
    assert!(Tool::Opencode.reads_prompt_from_stdin());
}

#[test]
fn only_codex_uses_shell_promise() {
    assert!(Tool::Codex.uses_shell_promise());
    assert!(!Tool::Claude.uses_shell_promise());
}

#[test]
fn serde_uses_lowercase() {
    let json = serde_json::to_string(&Tool::Opencode).unwrap();
    assert_eq!(json, "\"opencode\"");
    let back: Tool = serde_json::from_str(&json).unwrap();
    assert_eq!(back, Tool::Opencode);
}
