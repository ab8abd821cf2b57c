// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Multi-source aggregator.
//!
//! Holds an ordered list of sources. Listing concatenates per-source
//! results in declaration order and applies the post-filter; mutations
//! dispatch to the source tagged on the task. A source failing to list is
//! logged and skipped so a partially-unavailable environment still makes
//! progress; mutation failures always propagate.

use crate::{
    BeadsSource, GithubSource, LinearSource, SourceError, SourceSpec, TaskSource, TodolistSource,
};
use coders_core::{Task, TaskChange, TaskFilter};

/// Build a source from a parsed spec.
pub fn build_source(spec: &SourceSpec) -> Result<Box<dyn TaskSource>, SourceError> {
    match spec.kind.as_str() {
        "todolist" => Ok(Box::new(TodolistSource::new(spec.require("path")?))),
        "beads" => Ok(Box::new(BeadsSource::new(
            spec.param("bin").unwrap_or("bd"),
        ))),
        "linear" => Ok(Box::new(LinearSource::new(
            spec.require("key")?,
            spec.param("team").map(str::to_string),
        ))),
        "github" => Ok(Box::new(GithubSource::new(
            spec.require("repo")?,
            spec.require("token")?,
        ))),
        other => Err(SourceError::Spec(format!(
            "unknown source type: {} (expected todolist, beads, linear, or github)",
            other
        ))),
    }
}

/// Declaration-ordered aggregate of task sources.
#[derive(Default)]
pub struct MultiSource {
    sources: Vec<Box<dyn TaskSource>>,
}

impl MultiSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from source specs, in declaration order.
    pub fn from_specs(specs: &[SourceSpec]) -> Result<Self, SourceError> {
        let mut multi = Self::new();
        for spec in specs {
            multi.push(build_source(spec)?);
        }
        Ok(multi)
    }

    pub fn push(&mut self, source: Box<dyn TaskSource>) {
        self.sources.push(source);
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// List across all sources, swallowing per-source failures.
    ///
    /// Result order: sources in declaration order, tasks in source order
    /// within each. The filter (including only-ready and limit) is applied
    /// after concatenation.
    pub async fn list(&self, filter: &TaskFilter) -> Vec<Task> {
        let mut tasks = Vec::new();
        for source in &self.sources {
            match source.list(filter).await {
                Ok(batch) => tasks.extend(batch),
                Err(e) => {
                    let info = source.info();
                    tracing::warn!(
                        kind = info.kind,
                        label = %info.label,
                        error = %e,
                        "task source failed to list, skipping"
                    );
                }
            }
        }
        tasks.retain(|t| filter.matches(t));
        if let Some(limit) = filter.limit {
            tasks.truncate(limit);
        }
        tasks
    }

    /// Fetch a task by id, trying sources in declaration order.
    pub async fn get(&self, id: &str) -> Result<Task, SourceError> {
        for source in &self.sources {
            match source.get(id).await {
                Ok(task) => return Ok(task),
                Err(SourceError::NotFound(_)) => continue,
                Err(e) => {
                    let info = source.info();
                    tracing::debug!(kind = info.kind, error = %e, "get failed, trying next source");
                }
            }
        }
        Err(SourceError::NotFound(id.to_string()))
    }

    pub async fn update(&self, task: &Task, change: TaskChange) -> Result<(), SourceError> {
        self.dispatch(task, |source| {
            let change = change.clone();
            let id = task.id.clone();
            async move { source.update(&id, change).await }
        })
        .await
    }

    pub async fn mark_complete(&self, task: &Task) -> Result<(), SourceError> {
        self.dispatch(task, |source| {
            let id = task.id.clone();
            async move { source.mark_complete(&id).await }
        })
        .await
    }

    pub async fn mark_blocked(&self, task: &Task, reason: &str) -> Result<(), SourceError> {
        self.dispatch(task, |source| {
            let id = task.id.clone();
            let reason = reason.to_string();
            async move { source.mark_blocked(&id, &reason).await }
        })
        .await
    }

    /// Close every source, keeping the first error.
    pub async fn close(&self) -> Result<(), SourceError> {
        let mut first_err = None;
        for source in &self.sources {
            if let Err(e) = source.close().await {
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Run an operation against sources whose kind matches the task's tag.
    ///
    /// A `NotFound` moves on to the next matching source (two checklists can
    /// share a kind); any other error propagates immediately.
    async fn dispatch<'a, F, Fut>(&'a self, task: &Task, mut op: F) -> Result<(), SourceError>
    where
        F: FnMut(&'a dyn TaskSource) -> Fut,
        Fut: std::future::Future<Output = Result<(), SourceError>> + 'a,
    {
        let mut saw_source = false;
        for source in &self.sources {
            if source.info().kind != task.source {
                continue;
            }
            saw_source = true;
            match op(source.as_ref()).await {
                Ok(()) => return Ok(()),
                Err(SourceError::NotFound(_)) => continue,
                Err(e) => return Err(e),
            }
        }
        if saw_source {
            Err(SourceError::NotFound(task.id.clone()))
        } else {
            Err(SourceError::Spec(format!(
                "no configured source of type {} for task {}",
                task.source, task.id
            )))
        }
    }
}

#[cfg(test)]
#[path = "multi_tests.rs"]
mod tests;
