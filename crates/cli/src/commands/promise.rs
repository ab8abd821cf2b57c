// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `coders promise` - Publish this session's terminal promise

use crate::client::{connect_store, current_session_id};
use anyhow::{Context, Result};
use clap::Args;
use coders_core::{Clock, Promise, PromiseStatus, SystemClock};
use coders_store::RecordsExt;

#[derive(Args)]
pub struct PromiseArgs {
    /// One-line summary of the outcome
    pub summary: String,

    /// completed, blocked, or needs-review
    #[arg(long, default_value = "completed")]
    pub status: String,

    /// What is blocking, repeatable (use with --status blocked)
    #[arg(long = "blocker")]
    pub blockers: Vec<String>,

    /// Session id override (defaults to CODERS_SESSION_ID or tmux lookup)
    #[arg(long)]
    pub session: Option<String>,
}

pub async fn run(args: PromiseArgs) -> Result<()> {
    let status: PromiseStatus = args
        .status
        .parse()
        .with_context(|| "config: invalid --status")?;

    let session_id = match args.session {
        Some(id) => coders_core::SessionId::new(id),
        None => current_session_id().await?,
    };

    // Promises are the loop's gate; publishing must not silently no-op.
    let store = connect_store().await?;

    let promise = Promise {
        session_id: session_id.clone(),
        timestamp: SystemClock.now_ms(),
        summary: args.summary,
        status,
        blockers: args.blockers,
    };
    store.put_promise(&promise).await.context("promise")?;

    println!("promise published for {} ({})", session_id, status);
    Ok(())
}
