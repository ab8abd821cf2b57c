// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Beads issue-tracker source.
//!
//! Shells out to the `bd` CLI with `--json` and maps its issue model onto
//! the normalized task shape. All operations are supported, including
//! blocked.

use crate::{SourceError, SourceInfo, TaskSource};
use async_trait::async_trait;
use coders_adapters::subprocess::{run_with_timeout, TRACKER_TIMEOUT};
use coders_core::{clamp_priority, Task, TaskChange, TaskFilter, TaskStatus};
use serde::Deserialize;
use std::collections::BTreeMap;
use tokio::process::Command;

/// Local tracker source (`beads:` or `beads:bin=/path/to/bd`).
pub struct BeadsSource {
    bin: String,
}

impl BeadsSource {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }

    async fn run(&self, args: &[&str]) -> Result<String, SourceError> {
        let mut cmd = Command::new(&self.bin);
        cmd.args(args);
        let description = format!("{} {}", self.bin, args.join(" "));
        let output = run_with_timeout(cmd, TRACKER_TIMEOUT, &description)
            .await
            .map_err(SourceError::Unavailable)?;
        if !output.status.success() {
            return Err(SourceError::Write(format!(
                "{} exited with {}: {}",
                description,
                output.status.code().unwrap_or(-1),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Issue shape emitted by `bd --json`. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
struct BeadIssue {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    priority: i64,
    #[serde(default)]
    assignee: Option<String>,
    #[serde(default)]
    labels: Vec<String>,
    #[serde(default)]
    blocked_by: Vec<String>,
    #[serde(default)]
    blocks: Vec<String>,
}

fn map_status(raw: &str) -> TaskStatus {
    match raw {
        "open" | "ready" => TaskStatus::Open,
        "in_progress" => TaskStatus::InProgress,
        "closed" | "done" => TaskStatus::Completed,
        "blocked" => TaskStatus::Blocked,
        "cancelled" | "canceled" => TaskStatus::Cancelled,
        // Unknown source statuses map to open
        _ => TaskStatus::Open,
    }
}

fn map_issue(issue: BeadIssue) -> Task {
    Task {
        id: issue.id.clone(),
        title: issue.title,
        description: issue.description,
        status: map_status(&issue.status),
        priority: clamp_priority(issue.priority),
        source: "beads".to_string(),
        origin_id: issue.id,
        metadata: BTreeMap::new(),
        created_at: None,
        updated_at: None,
        assignee: issue.assignee,
        labels: issue.labels,
        blocked_by: issue.blocked_by,
        blocks: issue.blocks,
    }
}

fn parse_issue_list(raw: &str) -> Result<Vec<Task>, SourceError> {
    let issues: Vec<BeadIssue> =
        serde_json::from_str(raw).map_err(|e| SourceError::Read(format!("bd json: {}", e)))?;
    Ok(issues.into_iter().map(map_issue).collect())
}

fn parse_issue(raw: &str) -> Result<Task, SourceError> {
    let issue: BeadIssue =
        serde_json::from_str(raw).map_err(|e| SourceError::Read(format!("bd json: {}", e)))?;
    Ok(map_issue(issue))
}

#[async_trait]
impl TaskSource for BeadsSource {
    fn info(&self) -> SourceInfo {
        SourceInfo {
            kind: "beads",
            label: self.bin.clone(),
        }
    }

    async fn list(&self, _filter: &TaskFilter) -> Result<Vec<Task>, SourceError> {
        let raw = self.run(&["list", "--json"]).await?;
        parse_issue_list(&raw)
    }

    async fn get(&self, id: &str) -> Result<Task, SourceError> {
        let raw = self.run(&["show", id, "--json"]).await?;
        parse_issue(&raw)
    }

    async fn update(&self, id: &str, change: TaskChange) -> Result<(), SourceError> {
        if let Some(status) = change.status {
            let native = match status {
                TaskStatus::Open => "open",
                TaskStatus::InProgress => "in_progress",
                TaskStatus::Completed => "closed",
                TaskStatus::Blocked => "blocked",
                TaskStatus::Cancelled => "cancelled",
            };
            self.run(&["update", id, "--status", native]).await?;
        }
        if let Some(ref assignee) = change.assignee {
            self.run(&["update", id, "--assignee", assignee]).await?;
        }
        for label in &change.add_labels {
            self.run(&["label", id, label]).await?;
        }
        if let Some(ref comment) = change.comment {
            self.run(&["comment", id, comment]).await?;
        }
        Ok(())
    }

    async fn mark_complete(&self, id: &str) -> Result<(), SourceError> {
        self.run(&["close", id]).await.map(|_| ())
    }

    async fn mark_blocked(&self, id: &str, reason: &str) -> Result<(), SourceError> {
        self.run(&["update", id, "--status", "blocked"]).await?;
        // The reason is advisory; a failed comment should not fail the mark.
        if let Err(e) = self.run(&["comment", id, reason]).await {
            tracing::warn!(id, error = %e, "bd comment failed");
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "beads_tests.rs"]
mod tests;
