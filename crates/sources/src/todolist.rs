// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File-backed checklist source.
//!
//! A plain text file where `[ ] title` lines are open tasks and `[x] title`
//! lines are completed ones. The only supported mutation is completion,
//! which rewrites the file in place.

use crate::{SourceError, SourceInfo, TaskSource};
use async_trait::async_trait;
use coders_core::{Task, TaskChange, TaskFilter, TaskStatus};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Checklist file source (`todolist:path=<file>`).
pub struct TodolistSource {
    path: PathBuf,
}

impl TodolistSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn basename(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "todolist".to_string())
    }

    async fn read_tasks(&self) -> Result<Vec<Task>, SourceError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| SourceError::Read(format!("{}: {}", self.path.display(), e)))?;
        Ok(parse_checklist(&content, &self.basename()))
    }
}

/// One parsed checklist line.
fn parse_line(line: &str) -> Option<(TaskStatus, &str)> {
    let trimmed = line.trim_start();
    if let Some(title) = trimmed.strip_prefix("[ ] ") {
        Some((TaskStatus::Open, title.trim_end()))
    } else {
        trimmed
            .strip_prefix("[x] ")
            .map(|title| (TaskStatus::Completed, title.trim_end()))
    }
}

/// Parse a checklist file into tasks. Ids are `todo-<basename>-<line>` with
/// 1-based line numbers, so they stay stable across unrelated edits to other
/// files.
fn parse_checklist(content: &str, basename: &str) -> Vec<Task> {
    content
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            let (status, title) = parse_line(line)?;
            let line_no = idx + 1;
            Some(Task {
                id: format!("todo-{}-{}", basename, line_no),
                title: title.to_string(),
                description: String::new(),
                status,
                priority: 2,
                source: "todolist".to_string(),
                origin_id: line_no.to_string(),
                metadata: BTreeMap::new(),
                created_at: None,
                updated_at: None,
                assignee: None,
                labels: Vec::new(),
                blocked_by: Vec::new(),
                blocks: Vec::new(),
            })
        })
        .collect()
}

/// Flip every `[ ] <title>` occurrence to `[x] <title>`.
///
/// The title is regex-escaped but the match is deliberately unanchored, so
/// two checklist lines with identical titles both flip. Idempotent: once no
/// open line carries the title, the rewrite is a no-op.
fn complete_title(content: &str, title: &str) -> Result<String, SourceError> {
    let pattern = format!(r"\[ \] {}", regex::escape(title));
    let re = regex::Regex::new(&pattern)
        .map_err(|e| SourceError::Write(format!("bad title pattern: {}", e)))?;
    Ok(re.replace_all(content, format!("[x] {}", title)).into_owned())
}

#[async_trait]
impl TaskSource for TodolistSource {
    fn info(&self) -> SourceInfo {
        SourceInfo {
            kind: "todolist",
            label: self.path.display().to_string(),
        }
    }

    async fn list(&self, _filter: &TaskFilter) -> Result<Vec<Task>, SourceError> {
        self.read_tasks().await
    }

    async fn get(&self, id: &str) -> Result<Task, SourceError> {
        self.read_tasks()
            .await?
            .into_iter()
            .find(|t| t.id == id)
            .ok_or_else(|| SourceError::NotFound(id.to_string()))
    }

    async fn update(&self, id: &str, change: TaskChange) -> Result<(), SourceError> {
        match change.status {
            Some(TaskStatus::Completed) => self.mark_complete(id).await,
            _ => Err(SourceError::Unsupported(format!(
                "todolist only supports completion (task {})",
                id
            ))),
        }
    }

    async fn mark_complete(&self, id: &str) -> Result<(), SourceError> {
        let task = self.get(id).await?;
        if task.status == TaskStatus::Completed {
            return Ok(());
        }
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| SourceError::Read(format!("{}: {}", self.path.display(), e)))?;
        let rewritten = complete_title(&content, &task.title)?;
        tokio::fs::write(&self.path, rewritten)
            .await
            .map_err(|e| SourceError::Write(format!("{}: {}", self.path.display(), e)))
    }

    async fn mark_blocked(&self, id: &str, _reason: &str) -> Result<(), SourceError> {
        Err(SourceError::Unsupported(format!(
            "todolist cannot mark tasks blocked (task {})",
            id
        )))
    }
}

#[cfg(test)]
#[path = "todolist_tests.rs"]
mod tests;
