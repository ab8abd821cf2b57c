// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal-multiplexer adapters.

mod tmux;

pub use tmux::TmuxMux;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeMux, FakeMuxSession, MuxCall};

use async_trait::async_trait;
use coders_core::SessionId;
use std::path::Path;
use thiserror::Error;

/// Errors from multiplexer operations
#[derive(Debug, Error)]
pub enum MuxError {
    #[error("session not found: {0}")]
    NotFound(String),
    #[error("spawn failed: {0}")]
    SpawnFailed(String),
    #[error("command failed: {0}")]
    CommandFailed(String),
    #[error("invalid key name: {0}")]
    InvalidKey(String),
    #[error("multiplexer unavailable: {0}")]
    Unavailable(String),
}

/// One multiplexer-listed session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MuxSession {
    pub id: SessionId,
    pub window_count: u32,
    /// Session creation time, epoch seconds.
    pub created_at: u64,
}

/// Named keys accepted by [`MuxAdapter::send_key`].
///
/// Anything outside this set fails with [`MuxError::InvalidKey`] rather than
/// being passed through to the multiplexer, where an unknown name would be
/// typed as literal text.
pub fn is_valid_key(name: &str) -> bool {
    const NAMED: &[&str] = &[
        "Enter", "Tab", "Escape", "Space", "BSpace", "Up", "Down", "Left", "Right", "Home", "End",
        "PageUp", "PageDown",
    ];
    if NAMED.contains(&name) {
        return true;
    }
    // Function keys F1..F12
    if let Some(n) = name.strip_prefix('F') {
        return matches!(n.parse::<u8>(), Ok(1..=12));
    }
    // Control-letter chords C-a .. C-z
    if let Some(letter) = name.strip_prefix("C-") {
        let mut chars = letter.chars();
        return matches!(
            (chars.next(), chars.next()),
            (Some('a'..='z'), None)
        );
    }
    false
}

/// Adapter over the terminal multiplexer.
///
/// Detached sessions are the unit of work: one session hosts one tool
/// process for one task.
#[async_trait]
pub trait MuxAdapter: Clone + Send + Sync + 'static {
    /// Check whether a session exists.
    async fn session_exists(&self, id: &SessionId) -> Result<bool, MuxError>;

    /// Create a detached session running `command_line` in `cwd`.
    ///
    /// The window runs `cd <cwd> && <command_line>; exec <user_shell>` so a
    /// shell prompt stays observable after the tool process exits.
    async fn create_detached(
        &self,
        id: &SessionId,
        cwd: &Path,
        command_line: &str,
    ) -> Result<(), MuxError>;

    /// Kill a session. Killing an already-dead session is not an error.
    async fn kill(&self, id: &SessionId) -> Result<(), MuxError>;

    /// List managed sessions (ids with the reserved `coder-` prefix only).
    async fn list(&self) -> Result<Vec<MuxSession>, MuxError>;

    /// Pane process ids for a session.
    async fn pane_pids(&self, id: &SessionId) -> Result<Vec<u32>, MuxError>;

    /// Capture the scrollback tail of the session's pane.
    async fn capture_pane(&self, id: &SessionId, tail_lines: u32) -> Result<String, MuxError>;

    /// Send literal text (no key-name interpretation).
    async fn send_text(&self, id: &SessionId, text: &str) -> Result<(), MuxError>;

    /// Send a named key from the whitelisted set.
    async fn send_key(&self, id: &SessionId, key: &str) -> Result<(), MuxError>;

    /// Whether any descendant of the session's panes has a command name
    /// containing one of `patterns`.
    async fn tool_process_running(
        &self,
        id: &SessionId,
        patterns: &[&str],
    ) -> Result<bool, MuxError>;

    /// Show a transient status message, if the multiplexer supports one.
    /// Best-effort; the default does nothing.
    async fn display_message(&self, _id: &SessionId, _message: &str) -> Result<(), MuxError> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
