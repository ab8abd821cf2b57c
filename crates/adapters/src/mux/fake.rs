// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake multiplexer adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{is_valid_key, MuxAdapter, MuxError, MuxSession};
use async_trait::async_trait;
use coders_core::{SessionId, SESSION_PREFIX};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Recorded multiplexer call
#[derive(Debug, Clone)]
pub enum MuxCall {
    CreateDetached {
        id: SessionId,
        cwd: PathBuf,
        command_line: String,
    },
    Kill {
        id: SessionId,
    },
    SendText {
        id: SessionId,
        text: String,
    },
    SendKey {
        id: SessionId,
        key: String,
    },
    DisplayMessage {
        id: SessionId,
        message: String,
    },
}

/// Fake session state
#[derive(Debug, Clone)]
pub struct FakeMuxSession {
    pub cwd: PathBuf,
    pub command_line: String,
    pub output: Vec<String>,
    pub pids: Vec<u32>,
    pub alive: bool,
    pub created_at: u64,
    /// What `tool_process_running` reports for this session.
    pub tool_running: bool,
}

struct FakeMuxState {
    sessions: BTreeMap<String, FakeMuxSession>,
    calls: Vec<MuxCall>,
    spawn_tool_running: bool,
}

impl Default for FakeMuxState {
    fn default() -> Self {
        Self {
            sessions: BTreeMap::new(),
            calls: Vec::new(),
            spawn_tool_running: true,
        }
    }
}

/// Fake multiplexer adapter for testing
#[derive(Clone, Default)]
pub struct FakeMux {
    inner: Arc<Mutex<FakeMuxState>>,
}

impl FakeMux {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<MuxCall> {
        self.inner.lock().calls.clone()
    }

    /// Get a session by id
    pub fn session(&self, id: &SessionId) -> Option<FakeMuxSession> {
        self.inner.lock().sessions.get(id.as_str()).cloned()
    }

    /// Pre-seed a session without going through `create_detached`.
    pub fn add_session(&self, id: &SessionId, session: FakeMuxSession) {
        self.inner
            .lock()
            .sessions
            .insert(id.to_string(), session);
    }

    /// Set pane output lines
    pub fn set_output(&self, id: &SessionId, output: Vec<String>) {
        if let Some(session) = self.inner.lock().sessions.get_mut(id.as_str()) {
            session.output = output;
        }
    }

    /// Set pane process ids
    pub fn set_pids(&self, id: &SessionId, pids: Vec<u32>) {
        if let Some(session) = self.inner.lock().sessions.get_mut(id.as_str()) {
            session.pids = pids;
        }
    }

    /// Mark the session's pane as dead (session listed, no processes)
    pub fn set_dead(&self, id: &SessionId) {
        if let Some(session) = self.inner.lock().sessions.get_mut(id.as_str()) {
            session.pids.clear();
            session.alive = false;
            session.tool_running = false;
        }
    }

    /// Whether sessions created via `create_detached` start with a live
    /// tool process (default true).
    pub fn set_spawn_tool_running(&self, running: bool) {
        self.inner.lock().spawn_tool_running = running;
    }

    /// Control what `tool_process_running` reports.
    pub fn set_tool_running(&self, id: &SessionId, running: bool) {
        if let Some(session) = self.inner.lock().sessions.get_mut(id.as_str()) {
            session.tool_running = running;
        }
    }

    /// Remove the session entirely, as an external `kill-session` would.
    pub fn remove_session(&self, id: &SessionId) {
        self.inner.lock().sessions.remove(id.as_str());
    }
}

impl FakeMuxSession {
    /// A running session with one shell pid and a live tool process.
    pub fn running(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            command_line: String::new(),
            output: Vec::new(),
            pids: vec![1000],
            alive: true,
            created_at: 0,
            tool_running: true,
        }
    }
}

#[async_trait]
impl MuxAdapter for FakeMux {
    async fn session_exists(&self, id: &SessionId) -> Result<bool, MuxError> {
        Ok(self.inner.lock().sessions.contains_key(id.as_str()))
    }

    async fn create_detached(
        &self,
        id: &SessionId,
        cwd: &Path,
        command_line: &str,
    ) -> Result<(), MuxError> {
        let mut inner = self.inner.lock();
        inner.calls.push(MuxCall::CreateDetached {
            id: id.clone(),
            cwd: cwd.to_path_buf(),
            command_line: command_line.to_string(),
        });
        let tool_running = inner.spawn_tool_running;
        inner.sessions.insert(
            id.to_string(),
            FakeMuxSession {
                cwd: cwd.to_path_buf(),
                command_line: command_line.to_string(),
                output: Vec::new(),
                pids: vec![1000],
                alive: true,
                created_at: 0,
                tool_running,
            },
        );
        Ok(())
    }

    async fn kill(&self, id: &SessionId) -> Result<(), MuxError> {
        let mut inner = self.inner.lock();
        inner.calls.push(MuxCall::Kill { id: id.clone() });
        inner.sessions.remove(id.as_str());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<MuxSession>, MuxError> {
        Ok(self
            .inner
            .lock()
            .sessions
            .iter()
            .filter(|(name, _)| name.starts_with(SESSION_PREFIX))
            .map(|(name, session)| MuxSession {
                id: SessionId::new(name.as_str()),
                window_count: 1,
                created_at: session.created_at,
            })
            .collect())
    }

    async fn pane_pids(&self, id: &SessionId) -> Result<Vec<u32>, MuxError> {
        match self.inner.lock().sessions.get(id.as_str()) {
            Some(session) => Ok(session.pids.clone()),
            None => Err(MuxError::NotFound(id.to_string())),
        }
    }

    async fn capture_pane(&self, id: &SessionId, tail_lines: u32) -> Result<String, MuxError> {
        match self.inner.lock().sessions.get(id.as_str()) {
            Some(session) => {
                let lines = &session.output;
                let start = lines.len().saturating_sub(tail_lines as usize);
                Ok(lines[start..].join("\n"))
            }
            None => Err(MuxError::NotFound(id.to_string())),
        }
    }

    async fn send_text(&self, id: &SessionId, text: &str) -> Result<(), MuxError> {
        let mut inner = self.inner.lock();
        if !inner.sessions.contains_key(id.as_str()) {
            return Err(MuxError::NotFound(id.to_string()));
        }
        inner.calls.push(MuxCall::SendText {
            id: id.clone(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_key(&self, id: &SessionId, key: &str) -> Result<(), MuxError> {
        if !is_valid_key(key) {
            return Err(MuxError::InvalidKey(key.to_string()));
        }
        let mut inner = self.inner.lock();
        if !inner.sessions.contains_key(id.as_str()) {
            return Err(MuxError::NotFound(id.to_string()));
        }
        inner.calls.push(MuxCall::SendKey {
            id: id.clone(),
            key: key.to_string(),
        });
        Ok(())
    }

    async fn tool_process_running(
        &self,
        id: &SessionId,
        _patterns: &[&str],
    ) -> Result<bool, MuxError> {
        match self.inner.lock().sessions.get(id.as_str()) {
            Some(session) => Ok(session.tool_running),
            None => Err(MuxError::NotFound(id.to_string())),
        }
    }

    async fn display_message(&self, id: &SessionId, message: &str) -> Result<(), MuxError> {
        self.inner.lock().calls.push(MuxCall::DisplayMessage {
            id: id.clone(),
            message: message.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
