// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The closed set of supported assistant tools.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An interactive assistant CLI that can run inside a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    Claude,
    Gemini,
    Codex,
    Opencode,
}

impl Tool {
    /// All supported tools, in display order.
    pub const ALL: [Tool; 4] = [Tool::Claude, Tool::Gemini, Tool::Codex, Tool::Opencode];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tool::Claude => "claude",
            Tool::Gemini => "gemini",
            Tool::Codex => "codex",
            Tool::Opencode => "opencode",
        }
    }

    /// Process-command-name substrings that identify this tool's binary.
    ///
    /// Readiness and crash detection match pane descendants against this
    /// set. Wrapper scripts and launchers vary across platforms, so the
    /// match set is data rather than a hard-coded name at call sites.
    pub fn process_patterns(&self) -> &'static [&'static str] {
        match self {
            Tool::Claude => &["claude"],
            Tool::Gemini => &["gemini"],
            Tool::Codex => &["codex"],
            Tool::Opencode => &["opencode"],
        }
    }

    /// Whether the tool reads its initial prompt from stdin.
    ///
    /// Gemini is the odd one out: it takes the prompt via a flag.
    pub fn reads_prompt_from_stdin(&self) -> bool {
        !matches!(self, Tool::Gemini)
    }

    /// Whether the assistant publishes promises with the shell-style
    /// `coders promise` command rather than the slash-command form.
    pub fn uses_shell_promise(&self) -> bool {
        matches!(self, Tool::Codex)
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error for an unknown tool name.
#[derive(Debug, thiserror::Error)]
#[error("unknown tool: {0} (expected claude, gemini, codex, or opencode)")]
pub struct UnknownTool(pub String);

impl FromStr for Tool {
    type Err = UnknownTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "claude" => Ok(Tool::Claude),
            "gemini" => Ok(Tool::Gemini),
            "codex" => Ok(Tool::Codex),
            "opencode" => Ok(Tool::Opencode),
            other => Err(UnknownTool(other.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "tool_tests.rs"]
mod tests;
