// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared connections for CLI commands.

use anyhow::{anyhow, Context, Result};
use coders_core::SessionId;
use coders_engine::env;
use coders_store::RedisStore;

/// Connect to the store or fail with remediation text.
pub async fn connect_store() -> Result<RedisStore> {
    let url = env::redis_url();
    RedisStore::connect(&url)
        .await
        .with_context(|| format!("store: cannot reach {}", url))
}

/// Connect to the store, degrading to `None` with a warning on failure.
pub async fn try_connect_store() -> Option<RedisStore> {
    match connect_store().await {
        Ok(store) => Some(store),
        Err(e) => {
            eprintln!("coders: warning: {:#}; continuing degraded", e);
            None
        }
    }
}

/// The session this process runs inside, from the environment or the
/// surrounding tmux session.
pub async fn current_session_id() -> Result<SessionId> {
    if let Some(id) = env::session_id() {
        return Ok(SessionId::new(id));
    }

    // Fall back to asking tmux which session we're attached to
    let output = tokio::process::Command::new("tmux")
        .args(["display-message", "-p", "#S"])
        .output()
        .await
        .context("session: CODERS_SESSION_ID not set and tmux lookup failed")?;
    if output.status.success() {
        let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !name.is_empty() {
            return Ok(SessionId::new(name));
        }
    }
    Err(anyhow!(
        "session: set CODERS_SESSION_ID or run from inside a managed tmux session"
    ))
}
