// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! coders-sources: Pluggable task sources.
//!
//! Four source kinds behind one capability set — a file-backed checklist,
//! the `bd` issue-tracker CLI, Linear (GraphQL), and GitHub issues (REST) —
//! plus a declaration-ordered aggregator.

mod beads;
mod github;
mod linear;
mod multi;
mod spec;
mod todolist;

pub use beads::BeadsSource;
pub use github::GithubSource;
pub use linear::LinearSource;
pub use multi::{build_source, MultiSource};
pub use spec::SourceSpec;
pub use todolist::TodolistSource;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeSource, SourceCall};

use async_trait::async_trait;
use coders_core::{Task, TaskChange, TaskFilter};
use thiserror::Error;

/// Errors from task-source operations.
///
/// Read and write failures are distinct because the aggregator swallows
/// read failures on `list` while mutation failures always propagate.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("source read failed: {0}")]
    Read(String),
    #[error("source write failed: {0}")]
    Write(String),
    #[error("unsupported operation: {0}")]
    Unsupported(String),
    #[error("invalid source spec: {0}")]
    Spec(String),
    #[error("source unavailable: {0}")]
    Unavailable(String),
    #[error("task not found: {0}")]
    NotFound(String),
}

/// Descriptor for a source instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceInfo {
    /// Source-type tag; matches `Task::source` on every task it yields.
    pub kind: &'static str,
    /// Human-readable instance label (path, repo, team).
    pub label: String,
}

/// Uniform capability set over heterogeneous issue trackers.
#[async_trait]
pub trait TaskSource: Send + Sync {
    fn info(&self) -> SourceInfo;

    /// List tasks. The filter is advisory here (sources narrow where their
    /// backend can); the aggregator re-applies it as a post-filter.
    async fn list(&self, filter: &TaskFilter) -> Result<Vec<Task>, SourceError>;

    async fn get(&self, id: &str) -> Result<Task, SourceError>;

    async fn update(&self, id: &str, change: TaskChange) -> Result<(), SourceError>;

    async fn mark_complete(&self, id: &str) -> Result<(), SourceError>;

    async fn mark_blocked(&self, id: &str, reason: &str) -> Result<(), SourceError>;

    /// Release any held resources. Default is a no-op.
    async fn close(&self) -> Result<(), SourceError> {
        Ok(())
    }
}
