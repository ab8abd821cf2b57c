// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `coders health` - One-shot or continuous health check

use crate::client::connect_store;
use anyhow::{Context, Result};
use clap::Args;
use coders_adapters::TmuxMux;
use coders_core::{format_elapsed_ms, HealthCheckSummary, SystemClock};
use coders_engine::{env, run_health_check_once, run_health_check_watch, Shutdown};

#[derive(Args)]
pub struct HealthArgs {
    /// Keep checking on an interval instead of exiting after one pass
    #[arg(long)]
    pub watch: bool,
}

pub async fn run(args: HealthArgs) -> Result<()> {
    // Unlike spawn, a health check without the store is meaningless: abort.
    let store = connect_store().await?;
    let mux = TmuxMux::new();

    if args.watch {
        let shutdown = Shutdown::install_signals().context("health: signal setup failed")?;
        run_health_check_watch(
            &mux,
            &store,
            &SystemClock,
            env::health_interval(),
            &shutdown,
            print_summary,
        )
        .await
        .context("health")?;
    } else {
        let summary = run_health_check_once(&mux, &store, &SystemClock)
            .await
            .context("health")?;
        print_summary(&summary);
    }
    Ok(())
}

fn print_summary(summary: &HealthCheckSummary) {
    if summary.results.is_empty() {
        println!("no managed sessions");
        return;
    }
    for result in &summary.results {
        let age = result
            .heartbeat_age_ms
            .map(format_elapsed_ms)
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<40} {:<12} hb {:<8} {}",
            result.session_id, result.status, age, result.message
        );
    }
    println!(
        "{} healthy, {} stale, {} dead, {} stuck, {} unresponsive",
        summary.healthy, summary.stale, summary.dead, summary.stuck, summary.unresponsive
    );
}
