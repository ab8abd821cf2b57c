// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake task source for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use crate::{SourceError, SourceInfo, TaskSource};
use async_trait::async_trait;
use coders_core::{Task, TaskChange, TaskFilter, TaskStatus};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Recorded source call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceCall {
    List,
    Get { id: String },
    Update { id: String },
    MarkComplete { id: String },
    MarkBlocked { id: String, reason: String },
    Close,
}

struct FakeSourceState {
    tasks: Vec<Task>,
    calls: Vec<SourceCall>,
    fail_list: bool,
    fail_writes: bool,
}

/// Fake task source for testing
#[derive(Clone)]
pub struct FakeSource {
    kind: &'static str,
    label: String,
    inner: Arc<Mutex<FakeSourceState>>,
}

impl FakeSource {
    pub fn new(kind: &'static str, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
            inner: Arc::new(Mutex::new(FakeSourceState {
                tasks: Vec::new(),
                calls: Vec::new(),
                fail_list: false,
                fail_writes: false,
            })),
        }
    }

    /// Build a minimal open task owned by this source.
    pub fn task(&self, id: &str, title: &str) -> Task {
        Task {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            status: TaskStatus::Open,
            priority: 2,
            source: self.kind.to_string(),
            origin_id: id.to_string(),
            metadata: BTreeMap::new(),
            created_at: None,
            updated_at: None,
            assignee: None,
            labels: Vec::new(),
            blocked_by: Vec::new(),
            blocks: Vec::new(),
        }
    }

    pub fn add_task(&self, task: Task) {
        self.inner.lock().tasks.push(task);
    }

    pub fn add_open_task(&self, id: &str, title: &str) {
        let task = self.task(id, title);
        self.add_task(task);
    }

    pub fn set_fail_list(&self, fail: bool) {
        self.inner.lock().fail_list = fail;
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.lock().fail_writes = fail;
    }

    pub fn calls(&self) -> Vec<SourceCall> {
        self.inner.lock().calls.clone()
    }

    pub fn task_status(&self, id: &str) -> Option<TaskStatus> {
        self.inner
            .lock()
            .tasks
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.status)
    }
}

#[async_trait]
impl TaskSource for FakeSource {
    fn info(&self) -> SourceInfo {
        SourceInfo {
            kind: self.kind,
            label: self.label.clone(),
        }
    }

    async fn list(&self, _filter: &TaskFilter) -> Result<Vec<Task>, SourceError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SourceCall::List);
        if inner.fail_list {
            return Err(SourceError::Read("fake list failure".to_string()));
        }
        Ok(inner.tasks.clone())
    }

    async fn get(&self, id: &str) -> Result<Task, SourceError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SourceCall::Get { id: id.to_string() });
        inner
            .tasks
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(id.to_string()))
    }

    async fn update(&self, id: &str, change: TaskChange) -> Result<(), SourceError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SourceCall::Update { id: id.to_string() });
        if inner.fail_writes {
            return Err(SourceError::Write("fake write failure".to_string()));
        }
        let task = inner
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| SourceError::NotFound(id.to_string()))?;
        if let Some(status) = change.status {
            task.status = status;
        }
        if let Some(assignee) = change.assignee {
            task.assignee = Some(assignee);
        }
        task.labels.extend(change.add_labels);
        Ok(())
    }

    async fn mark_complete(&self, id: &str) -> Result<(), SourceError> {
        let mut inner = self.inner.lock();
        inner
            .calls
            .push(SourceCall::MarkComplete { id: id.to_string() });
        if inner.fail_writes {
            return Err(SourceError::Write("fake write failure".to_string()));
        }
        let task = inner
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| SourceError::NotFound(id.to_string()))?;
        task.status = TaskStatus::Completed;
        Ok(())
    }

    async fn mark_blocked(&self, id: &str, reason: &str) -> Result<(), SourceError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SourceCall::MarkBlocked {
            id: id.to_string(),
            reason: reason.to_string(),
        });
        if inner.fail_writes {
            return Err(SourceError::Write("fake write failure".to_string()));
        }
        let task = inner
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| SourceError::NotFound(id.to_string()))?;
        task.status = TaskStatus::Blocked;
        Ok(())
    }

    async fn close(&self) -> Result<(), SourceError> {
        self.inner.lock().calls.push(SourceCall::Close);
        Ok(())
    }
}
