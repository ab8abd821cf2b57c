// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `coders heartbeat` - Detached heartbeat emitter (internal)
//!
//! Forked by the supervisor; not meant to be run by hand.

use crate::client::connect_store;
use anyhow::{Context, Result};
use clap::Args;
use coders_adapters::TmuxMux;
use coders_core::{SessionId, SystemClock};
use coders_engine::{env, run_heartbeat_emitter, Shutdown};

#[derive(Args)]
pub struct HeartbeatArgs {
    /// Session to emit heartbeats for
    #[arg(long)]
    pub session: String,
}

pub async fn run(args: HeartbeatArgs) -> Result<()> {
    let store = connect_store().await?;
    let mux = TmuxMux::new();
    let session_id = SessionId::new(args.session);
    let shutdown = Shutdown::install_signals().context("heartbeat: signal setup failed")?;

    run_heartbeat_emitter(
        &mux,
        &store,
        &SystemClock,
        &session_id,
        env::heartbeat_interval(),
        &shutdown,
    )
    .await
    .context("heartbeat")?;
    Ok(())
}
