// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Prompt files handed to the tool at launch.
//!
//! Three sections: the task, a working directive, and the publish
//! instruction the assistant must run when it finishes. Restarted sessions
//! get an extra note so the assistant checks existing work first.

use coders_core::{SessionId, Tool};
use std::io;
use std::path::PathBuf;

/// Build the full prompt text for a session.
pub fn build_prompt(tool: Tool, task: &str, restart_number: Option<u32>) -> String {
    let mut prompt = format!("TASK: {}\n\n", task);

    if let Some(n) = restart_number {
        prompt.push_str(&format!(
            "NOTE: This is restart #{}. Check the work already done before starting over; \
             continue from where the previous run stopped.\n\n",
            n
        ));
    }

    prompt.push_str(
        "Work on the task above in the current directory. Commit or save your work as you go. \
         When the task is finished (or you cannot make further progress), publish your outcome \
         so the orchestrator can advance.\n\n",
    );

    if tool.uses_shell_promise() {
        prompt.push_str(
            "When done, run:\n  coders promise \"<one-line summary>\" --status completed\n\
             If you are blocked, run:\n  coders promise \"<summary>\" --status blocked --blocker \"<what is missing>\"\n",
        );
    } else {
        prompt.push_str(
            "When done, run:\n  /coders:promise \"<one-line summary>\"\n\
             If you are blocked, publish the promise with status blocked and name the blockers.\n",
        );
    }

    prompt
}

/// Write the prompt under the state directory and return its path.
pub fn write_prompt_file(session_id: &SessionId, content: &str) -> io::Result<PathBuf> {
    let dir = crate::paths::prompts_dir();
    crate::paths::ensure_dir(&dir)?;
    let path = crate::paths::prompt_file(session_id);
    std::fs::write(&path, content)?;
    Ok(path)
}

#[cfg(test)]
#[path = "prompt_tests.rs"]
mod tests;
