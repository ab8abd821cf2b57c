// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! coders - Orchestrate AI coding assistants in detached tmux sessions

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod client;
mod commands;

use clap::{Parser, Subcommand};
use commands::{health, heartbeat, promise, resume, run_loop, sessions, spawn, watch};

#[derive(Parser)]
#[command(
    name = "coders",
    version,
    about = "Run AI assistant CLIs in detached tmux sessions and drive them through tasks"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Spawn a tool session for a task
    Spawn(spawn::SpawnArgs),
    /// Run tasks from one or more sources, one session per task
    #[command(name = "loop")]
    Loop(run_loop::LoopArgs),
    /// Publish this session's promise (run from inside a session)
    Promise(promise::PromiseArgs),
    /// Delete a session's promise so it can be worked again
    Resume(resume::ResumeArgs),
    /// Check the health of every managed session
    Health(health::HealthArgs),
    /// List or kill managed sessions
    Sessions(sessions::SessionsArgs),
    /// Internal: heartbeat emitter for one session
    #[command(hide = true)]
    Heartbeat(heartbeat::HeartbeatArgs),
    /// Internal: crash watcher for one session
    #[command(hide = true)]
    Watch(watch::WatchArgs),
}

#[tokio::main]
async fn main() {
    setup_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Spawn(args) => spawn::run(args).await,
        Commands::Loop(args) => run_loop::run(args).await,
        Commands::Promise(args) => promise::run(args).await,
        Commands::Resume(args) => resume::run(args).await,
        Commands::Health(args) => health::run(args).await,
        Commands::Sessions(args) => sessions::run(args).await,
        Commands::Heartbeat(args) => heartbeat::run(args).await,
        Commands::Watch(args) => watch::run(args).await,
    };

    if let Err(e) = result {
        eprintln!("coders: {:#}", e);
        std::process::exit(1);
    }
}

/// Log to stderr; detached workers have stderr pointed at their log file.
fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
