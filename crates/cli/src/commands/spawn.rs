// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `coders spawn` - Launch a tool session for a task

use crate::client::try_connect_store;
use anyhow::{Context, Result};
use clap::Args;
use coders_adapters::TmuxMux;
use coders_core::{SystemClock, Tool, DEFAULT_MAX_RESTARTS};
use coders_engine::supervisor::backend_from_env;
use coders_engine::{launch, resolve_cwd, ExecSpawner, LaunchRequest};

#[derive(Args)]
pub struct SpawnArgs {
    /// Tool to run (claude, gemini, codex, opencode)
    #[arg(long, default_value = "claude")]
    pub tool: String,

    /// Task text embedded into the prompt
    #[arg(long, default_value = "")]
    pub task: String,

    /// Working directory (absolute, relative, or a zoxide query)
    #[arg(long)]
    pub cwd: Option<String>,

    /// Model override passed to the tool
    #[arg(long)]
    pub model: Option<String>,

    /// Do not start a heartbeat emitter for this session
    #[arg(long)]
    pub no_heartbeat: bool,

    /// Restart the session when the tool crashes
    #[arg(long)]
    pub restart_on_crash: bool,

    /// Restart budget for --restart-on-crash
    #[arg(long, default_value_t = DEFAULT_MAX_RESTARTS)]
    pub max_restarts: u32,

    /// Route the tool through the alternate backend configured via
    /// CODERS_BACKEND_URL / CODERS_BACKEND_TOKEN
    #[arg(long)]
    pub alt_backend: bool,
}

pub async fn run(args: SpawnArgs) -> Result<()> {
    let tool: Tool = args
        .tool
        .parse()
        .with_context(|| "config: invalid --tool")?;

    let cwd = match &args.cwd {
        Some(raw) => resolve_cwd(raw).await.context("spawn")?,
        None => std::env::current_dir().context("spawn: cannot resolve current directory")?,
    };

    let store = try_connect_store().await;
    let mux = TmuxMux::new();

    let mut request = LaunchRequest::new(tool, args.task, cwd);
    request.model = args.model;
    request.heartbeat = !args.no_heartbeat;
    request.restart_on_crash = args.restart_on_crash;
    request.max_restarts = args.max_restarts;
    request.backend = backend_from_env(args.alt_backend);

    let report = launch(&mux, store.as_ref(), &ExecSpawner, &SystemClock, &request)
        .await
        .context("spawn")?;

    println!("session {} started", report.session_id);
    if !report.ready {
        println!("note: {} process not confirmed yet; check the pane", tool);
    }
    for warning in &report.warnings {
        println!("warning: {}", warning);
    }
    println!("attach with: tmux attach -t {}", report.session_id);
    Ok(())
}
