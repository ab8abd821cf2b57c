// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tmux multiplexer adapter

use super::{is_valid_key, MuxAdapter, MuxError, MuxSession};
use crate::subprocess::run_with_timeout;
use async_trait::async_trait;
use coders_core::{SessionId, SESSION_PREFIX};
use std::path::Path;
use tokio::process::Command;

/// Tmux-based multiplexer adapter
#[derive(Clone, Default)]
pub struct TmuxMux;

impl TmuxMux {
    pub fn new() -> Self {
        Self
    }

    async fn tmux(&self, args: &[&str], description: &str) -> Result<std::process::Output, MuxError> {
        let mut cmd = Command::new("tmux");
        cmd.args(args);
        run_with_timeout(cmd, crate::env::mux_timeout(), description)
            .await
            .map_err(|e| {
                if e.contains("No such file") || e.contains("not found") {
                    MuxError::Unavailable(e)
                } else {
                    MuxError::CommandFailed(e)
                }
            })
    }
}

/// The shell line run inside a new window.
///
/// The trailing `exec` keeps the window alive after the tool exits, turning
/// crash detection into "shell prompt visible" instead of "session gone".
fn window_command(cwd: &Path, command_line: &str, user_shell: &str) -> String {
    format!(
        "cd {} && {}; exec {}",
        shell_quote(&cwd.display().to_string()),
        command_line,
        user_shell
    )
}

/// Quote a string for safe interpolation into a shell line.
pub(crate) fn shell_quote(s: &str) -> String {
    if !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '.' | '-' | '_' | ':' | '=' | '@'))
    {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', r"'\''"))
    }
}

#[async_trait]
impl MuxAdapter for TmuxMux {
    async fn session_exists(&self, id: &SessionId) -> Result<bool, MuxError> {
        let output = self
            .tmux(&["has-session", "-t", id.as_str()], "tmux has-session")
            .await?;
        Ok(output.status.success())
    }

    async fn create_detached(
        &self,
        id: &SessionId,
        cwd: &Path,
        command_line: &str,
    ) -> Result<(), MuxError> {
        if !cwd.exists() {
            return Err(MuxError::SpawnFailed(format!(
                "working directory does not exist: {}",
                cwd.display()
            )));
        }

        let shell = std::env::var("SHELL").unwrap_or_else(|_| "/bin/sh".to_string());
        let window = window_command(cwd, command_line, &shell);

        let output = self
            .tmux(
                &["new-session", "-d", "-s", id.as_str(), window.as_str()],
                "tmux new-session",
            )
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!(session_id = %id, stderr = %stderr, "tmux spawn failed");
            return Err(MuxError::SpawnFailed(stderr.to_string()));
        }

        // Log stderr even on success - may contain useful warnings
        if !output.stderr.is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!(session_id = %id, stderr = %stderr, "tmux spawn stderr (non-fatal)");
        }

        Ok(())
    }

    async fn kill(&self, id: &SessionId) -> Result<(), MuxError> {
        let output = self
            .tmux(&["kill-session", "-t", id.as_str()], "tmux kill-session")
            .await?;
        if !output.status.success() {
            // Session might already be dead, which is fine
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<MuxSession>, MuxError> {
        let output = self
            .tmux(
                &[
                    "list-sessions",
                    "-F",
                    "#{session_name}\t#{session_windows}\t#{session_created}",
                ],
                "tmux list-sessions",
            )
            .await?;

        // tmux exits non-zero when no server is running; that's an empty list
        if !output.status.success() {
            return Ok(Vec::new());
        }

        Ok(parse_session_list(&String::from_utf8_lossy(&output.stdout)))
    }

    async fn pane_pids(&self, id: &SessionId) -> Result<Vec<u32>, MuxError> {
        let output = self
            .tmux(
                &["list-panes", "-s", "-t", id.as_str(), "-F", "#{pane_pid}"],
                "tmux list-panes",
            )
            .await?;

        if !output.status.success() {
            return Err(MuxError::NotFound(id.to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .filter_map(|line| line.trim().parse::<u32>().ok())
            .collect())
    }

    async fn capture_pane(&self, id: &SessionId, tail_lines: u32) -> Result<String, MuxError> {
        let start = format!("-{}", tail_lines);
        let output = self
            .tmux(
                &["capture-pane", "-t", id.as_str(), "-p", "-S", start.as_str()],
                "tmux capture-pane",
            )
            .await?;

        if !output.status.success() {
            return Err(MuxError::NotFound(id.to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    async fn send_text(&self, id: &SessionId, text: &str) -> Result<(), MuxError> {
        // -l = literal mode (no key name interpretation)
        // -- = end of options (handles text starting with -)
        let output = self
            .tmux(
                &["send-keys", "-t", id.as_str(), "-l", "--", text],
                "tmux send-keys",
            )
            .await?;

        if !output.status.success() {
            return Err(MuxError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn send_key(&self, id: &SessionId, key: &str) -> Result<(), MuxError> {
        if !is_valid_key(key) {
            return Err(MuxError::InvalidKey(key.to_string()));
        }

        let output = self
            .tmux(&["send-keys", "-t", id.as_str(), key], "tmux send-keys")
            .await?;

        if !output.status.success() {
            return Err(MuxError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn tool_process_running(
        &self,
        id: &SessionId,
        patterns: &[&str],
    ) -> Result<bool, MuxError> {
        let pids = self.pane_pids(id).await?;
        if pids.is_empty() {
            return Ok(false);
        }
        crate::process::tool_process_running(&pids, patterns)
            .await
            .map_err(MuxError::CommandFailed)
    }

    async fn display_message(&self, id: &SessionId, message: &str) -> Result<(), MuxError> {
        let output = self
            .tmux(
                &["display-message", "-t", id.as_str(), message],
                "tmux display-message",
            )
            .await?;
        if !output.status.success() {
            return Err(MuxError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

/// Parse `list-sessions` output, keeping only managed sessions.
fn parse_session_list(raw: &str) -> Vec<MuxSession> {
    raw.lines()
        .filter_map(|line| {
            let mut parts = line.split('\t');
            let name = parts.next()?;
            if !name.starts_with(SESSION_PREFIX) {
                return None;
            }
            let window_count = parts.next()?.trim().parse().ok()?;
            let created_at = parts.next()?.trim().parse().ok()?;
            Some(MuxSession {
                id: SessionId::new(name),
                window_count,
                created_at,
            })
        })
        .collect()
}

#[cfg(test)]
#[path = "tmux_tests.rs"]
mod tests;
