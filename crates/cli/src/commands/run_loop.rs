// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `coders loop` - Work through tasks, one session per task

use crate::client::connect_store;
use anyhow::{anyhow, Context, Result};
use clap::Args;
use coders_adapters::{DesktopNotifyAdapter, TmuxMux};
use coders_core::{LoopId, LoopStatus, SystemClock, Tool};
use coders_engine::{
    detach::spawn_detached, paths, resolve_cwd, run_task_loop, ExecSpawner, LoopConfig, Shutdown,
};
use coders_sources::{MultiSource, SourceSpec};

#[derive(Args)]
pub struct LoopArgs {
    /// Task source spec, repeatable (e.g. todolist:path=/tmp/t.md)
    #[arg(long = "source", required = true)]
    pub sources: Vec<String>,

    /// Working directory for spawned sessions
    #[arg(long)]
    pub cwd: Option<String>,

    /// Tool to start the loop with
    #[arg(long, default_value = "claude")]
    pub tool: String,

    /// Model override passed to the tool
    #[arg(long)]
    pub model: Option<String>,

    /// Stop the loop when a task comes back blocked
    #[arg(long)]
    pub stop_on_blocked: bool,

    /// Skip tasks that are blocked by other tasks
    #[arg(long)]
    pub only_ready: bool,

    /// Detach: run the loop in a background process and return immediately
    #[arg(long)]
    pub background: bool,

    /// Loop id (generated when omitted)
    #[arg(long)]
    pub loop_id: Option<String>,
}

pub async fn run(args: LoopArgs) -> Result<()> {
    let tool: Tool = args.tool.parse().with_context(|| "config: invalid --tool")?;

    // Parse early so a bad spec fails fast in both modes.
    let specs: Vec<SourceSpec> = args
        .sources
        .iter()
        .map(|raw| raw.parse())
        .collect::<Result<_, _>>()
        .context("config")?;

    let loop_id = LoopId::new(
        args.loop_id
            .clone()
            .unwrap_or_else(|| format!("loop-{}", &uuid::Uuid::new_v4().to_string()[..8])),
    );

    if args.background {
        let child_args = background_args(&args, &specs, &loop_id);
        let log_path = paths::logs_dir().join(format!("{}.log", loop_id));
        let pid = spawn_detached(&child_args, &log_path)
            .context("loop: failed to start background process")?;
        println!("loop {} started in background (pid {})", loop_id, pid);
        println!("log: {}", log_path.display());
        return Ok(());
    }

    let cwd = match &args.cwd {
        Some(raw) => resolve_cwd(raw).await.context("loop")?,
        None => std::env::current_dir().context("loop: cannot resolve current directory")?,
    };

    let store = connect_store().await?;
    let sources = MultiSource::from_specs(&specs).context("config")?;
    let mux = TmuxMux::new();
    let notify = DesktopNotifyAdapter::new();
    let shutdown = Shutdown::install_signals().context("loop: signal setup failed")?;

    let mut cfg = LoopConfig::new(loop_id, cwd, tool);
    cfg.model = args.model.clone();
    cfg.stop_on_blocked = args.stop_on_blocked;
    cfg.only_ready = args.only_ready;

    let report = run_task_loop(
        &mux,
        &store,
        &ExecSpawner,
        &notify,
        &SystemClock,
        &sources,
        &cfg,
        &shutdown,
    )
    .await
    .context("loop")?;

    sources.close().await.ok();

    println!(
        "loop {}: {} ({}/{} tasks completed)",
        cfg.loop_id, report.status, report.completed, report.total_tasks
    );
    if report.status == LoopStatus::Failed {
        return Err(anyhow!("loop finished with status failed"));
    }
    Ok(())
}

/// Rebuild the argument list for the background re-exec.
///
/// Specs go through their parsed `Display` form, which round-trips exactly.
fn background_args(args: &LoopArgs, specs: &[SourceSpec], loop_id: &LoopId) -> Vec<String> {
    let mut child = vec!["loop".to_string()];
    for spec in specs {
        child.push("--source".to_string());
        child.push(spec.to_string());
    }
    if let Some(ref cwd) = args.cwd {
        child.push("--cwd".to_string());
        child.push(cwd.clone());
    }
    child.push("--tool".to_string());
    child.push(args.tool.clone());
    if let Some(ref model) = args.model {
        child.push("--model".to_string());
        child.push(model.clone());
    }
    if args.stop_on_blocked {
        child.push("--stop-on-blocked".to_string());
    }
    if args.only_ready {
        child.push("--only-ready".to_string());
    }
    child.push("--loop-id".to_string());
    child.push(loop_id.to_string());
    child
}

#[cfg(test)]
#[path = "run_loop_tests.rs"]
mod tests;
