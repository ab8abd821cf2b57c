// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-tree inspection via `ps`.
//!
//! Tool readiness and crash detection both work by walking the descendants
//! of a pane's root process and matching command names. Wrapper scripts and
//! launchers make single-level `pgrep -P` checks unreliable, so the whole
//! tree is walked from one `ps` snapshot.

use crate::subprocess::{run_with_timeout, PS_TIMEOUT};
use std::collections::{HashMap, HashSet, VecDeque};
use tokio::process::Command;

/// One row of the process table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRow {
    pub pid: u32,
    pub ppid: u32,
    /// Command name (basename, no arguments).
    pub command: String,
}

/// Snapshot the full process table as (pid, ppid, command) rows.
pub async fn process_table() -> Result<Vec<ProcessRow>, String> {
    let mut cmd = Command::new("ps");
    cmd.args(["-axo", "pid=,ppid=,comm="]);
    let output = run_with_timeout(cmd, PS_TIMEOUT, "ps").await?;
    if !output.status.success() {
        return Err(format!(
            "ps exited with {}",
            output.status.code().unwrap_or(-1)
        ));
    }
    Ok(parse_process_table(&String::from_utf8_lossy(&output.stdout)))
}

/// Parse `ps -axo pid=,ppid=,comm=` output. Malformed lines are skipped.
pub fn parse_process_table(raw: &str) -> Vec<ProcessRow> {
    raw.lines()
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let pid = parts.next()?.parse().ok()?;
            let ppid = parts.next()?.parse().ok()?;
            let command = parts.next()?.to_string();
            Some(ProcessRow { pid, ppid, command })
        })
        .collect()
}

/// Collect `roots` plus every (transitive) descendant from the table.
pub fn collect_descendants(table: &[ProcessRow], roots: &[u32]) -> Vec<ProcessRow> {
    let mut children: HashMap<u32, Vec<&ProcessRow>> = HashMap::new();
    for row in table {
        children.entry(row.ppid).or_default().push(row);
    }

    let mut seen: HashSet<u32> = roots.iter().copied().collect();
    let mut queue: VecDeque<u32> = roots.iter().copied().collect();
    let mut result = Vec::new();

    for row in table {
        if seen.contains(&row.pid) {
            result.push(row.clone());
        }
    }

    while let Some(pid) = queue.pop_front() {
        if let Some(kids) = children.get(&pid) {
            for kid in kids {
                if seen.insert(kid.pid) {
                    result.push((*kid).clone());
                    queue.push_back(kid.pid);
                }
            }
        }
    }

    result
}

/// Whether any descendant of `roots` has a command name containing one of
/// `patterns`.
pub fn any_descendant_matches(table: &[ProcessRow], roots: &[u32], patterns: &[&str]) -> bool {
    collect_descendants(table, roots)
        .iter()
        .any(|row| patterns.iter().any(|p| row.command.contains(p)))
}

/// Snapshot the process table and match descendants of `roots`.
pub async fn tool_process_running(roots: &[u32], patterns: &[&str]) -> Result<bool, String> {
    if roots.is_empty() {
        return Ok(false);
    }
    let table = process_table().await?;
    Ok(any_descendant_matches(&table, roots, patterns))
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
