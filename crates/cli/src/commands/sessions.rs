// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `coders sessions` - List or kill managed sessions

use anyhow::{Context, Result};
use clap::Args;
use coders_adapters::{MuxAdapter, TmuxMux};
use coders_core::{format_elapsed, Clock, SessionId, SystemClock};

#[derive(Args)]
pub struct SessionsArgs {
    /// Kill this session instead of listing
    #[arg(long)]
    pub kill: Option<String>,
}

pub async fn run(args: SessionsArgs) -> Result<()> {
    let mux = TmuxMux::new();

    if let Some(id) = args.kill {
        let session_id = SessionId::new(id);
        mux.kill(&session_id).await.context("sessions")?;
        println!("killed {}", session_id);
        return Ok(());
    }

    let sessions = mux.list().await.context("sessions")?;
    if sessions.is_empty() {
        println!("no managed sessions");
        return Ok(());
    }

    let now = SystemClock.now_secs();
    for session in sessions {
        let age = format_elapsed(now.saturating_sub(session.created_at));
        println!(
            "{:<40} {} window(s)  up {}",
            session.id, session.window_count, age
        );
    }
    Ok(())
}
