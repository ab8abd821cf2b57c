// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `coders watch` - Detached crash watcher (internal)
//!
//! Forked by the supervisor; not meant to be run by hand.

use crate::client::connect_store;
use anyhow::{Context, Result};
use clap::Args;
use coders_adapters::TmuxMux;
use coders_core::{SessionId, SystemClock};
use coders_engine::{env, run_crash_watcher, ExecSpawner, Shutdown, WatcherExit};

#[derive(Args)]
pub struct WatchArgs {
    /// Session to watch
    #[arg(long)]
    pub session: String,
}

pub async fn run(args: WatchArgs) -> Result<()> {
    let store = connect_store().await?;
    let mux = TmuxMux::new();
    let session_id = SessionId::new(args.session);
    let shutdown = Shutdown::install_signals().context("watch: signal setup failed")?;

    let exit = run_crash_watcher(
        &mux,
        &store,
        &ExecSpawner,
        &SystemClock,
        &session_id,
        env::watcher_poll(),
        &shutdown,
    )
    .await
    .context("watch")?;

    match exit {
        WatcherExit::BudgetExhausted => {
            tracing::warn!(session_id = %session_id, "restart budget exhausted")
        }
        WatcherExit::StateGone => {
            tracing::info!(session_id = %session_id, "session released")
        }
        WatcherExit::Signalled => {}
    }
    Ok(())
}
