// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess execution helpers

use std::process::Output;
use std::time::Duration;
use tokio::process::Command;

/// Default timeout for tmux commands.
pub const MUX_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout for process-listing utilities (ps, pgrep).
pub const PS_TIMEOUT: Duration = Duration::from_secs(5);

/// Default timeout for issue-tracker CLI invocations.
pub const TRACKER_TIMEOUT: Duration = Duration::from_secs(60);

/// Run an external command to completion, bounded by a deadline.
///
/// Every binary this crate shells out to (tmux, ps, trackers) goes through
/// here so a wedged child can never hang a tick loop. `what` names the
/// invocation in the error message. Hitting the deadline drops the tokio
/// `Child`, which kills the process.
pub async fn run_with_timeout(
    mut cmd: Command,
    deadline: Duration,
    what: &str,
) -> Result<Output, String> {
    tokio::time::timeout(deadline, cmd.output())
        .await
        .map_err(|_| format!("{} did not finish within {}s", what, deadline.as_secs()))?
        .map_err(|e| format!("{} could not run: {}", what, e))
}

/// Whether a binary is present on PATH.
///
/// Used to degrade gracefully when optional collaborators (zoxide, bd,
/// notifiers) are not installed.
pub async fn binary_on_path(name: &str) -> bool {
    let mut cmd = Command::new("which");
    cmd.arg(name);
    match run_with_timeout(cmd, PS_TIMEOUT, "which").await {
        Ok(output) => output.status.success(),
        Err(_) => false,
    }
}

#[cfg(test)]
#[path = "subprocess_tests.rs"]
mod tests;
