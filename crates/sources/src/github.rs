// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! GitHub issues source (REST v3).

use crate::{SourceError, SourceInfo, TaskSource};
use async_trait::async_trait;
use coders_core::{clamp_priority, Task, TaskChange, TaskFilter, TaskStatus};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::time::Duration;

const GITHUB_API: &str = "https://api.github.com";

const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// GitHub source (`github:repo=owner/name,token=<token>`).
pub struct GithubSource {
    client: reqwest::Client,
    base_url: String,
    repo: String,
    token: String,
}

impl GithubSource {
    pub fn new(repo: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: GITHUB_API.to_string(),
            repo: repo.into(),
            token: token.into(),
        }
    }

    /// Point at a non-default API root (GitHub Enterprise, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", "coders")
            .timeout(HTTP_TIMEOUT)
    }

    async fn send(
        &self,
        builder: reqwest::RequestBuilder,
        what: &str,
    ) -> Result<Value, SourceError> {
        let response = builder
            .send()
            .await
            .map_err(|e| SourceError::Unavailable(format!("github: {}", e)))?;
        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);
        if !status.is_success() {
            return Err(SourceError::Write(format!(
                "github {} returned {}: {}",
                what,
                status,
                body.get("message").and_then(Value::as_str).unwrap_or("")
            )));
        }
        Ok(body)
    }

    /// `gh-<number>` → `<number>`
    fn issue_number(id: &str) -> Result<u64, SourceError> {
        id.strip_prefix("gh-")
            .and_then(|n| n.parse().ok())
            .ok_or_else(|| SourceError::NotFound(format!("not a github task id: {}", id)))
    }
}

/// Derive priority from `P0`..`P4` or `priority:N` labels; default 2.
fn priority_from_labels(labels: &[String]) -> u8 {
    for label in labels {
        if let Some(n) = label.strip_prefix('P').and_then(|n| n.parse::<i64>().ok()) {
            return clamp_priority(n);
        }
        if let Some(n) = label
            .strip_prefix("priority:")
            .and_then(|n| n.trim().parse::<i64>().ok())
        {
            return clamp_priority(n);
        }
    }
    2
}

/// Map one REST issue object. Pull requests and malformed objects are
/// dropped.
fn map_issue(value: &Value) -> Option<Task> {
    if value.get("pull_request").is_some() {
        return None;
    }
    let number = value.get("number")?.as_u64()?;
    let title = value.get("title")?.as_str()?.to_string();
    let labels: Vec<String> = value
        .get("labels")
        .and_then(Value::as_array)
        .map(|ls| {
            ls.iter()
                .filter_map(|l| l.get("name").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let state = value.get("state").and_then(Value::as_str).unwrap_or("open");
    let status = if labels.iter().any(|l| l == "blocked") {
        TaskStatus::Blocked
    } else {
        match state {
            "closed" => TaskStatus::Completed,
            // GitHub only has open/closed; anything else maps to open
            _ => TaskStatus::Open,
        }
    };

    let mut metadata = BTreeMap::new();
    if let Some(url) = value.get("html_url").and_then(Value::as_str) {
        metadata.insert("url".to_string(), url.to_string());
    }

    Some(Task {
        id: format!("gh-{}", number),
        title,
        description: value
            .get("body")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        status,
        priority: priority_from_labels(&labels),
        source: "github".to_string(),
        origin_id: number.to_string(),
        metadata,
        created_at: None,
        updated_at: None,
        assignee: value
            .pointer("/assignee/login")
            .and_then(Value::as_str)
            .map(str::to_string),
        labels,
        blocked_by: Vec::new(),
        blocks: Vec::new(),
    })
}

fn map_issue_list(body: &Value) -> Vec<Task> {
    body.as_array()
        .map(|issues| issues.iter().filter_map(map_issue).collect())
        .unwrap_or_default()
}

#[async_trait]
impl TaskSource for GithubSource {
    fn info(&self) -> SourceInfo {
        SourceInfo {
            kind: "github",
            label: self.repo.clone(),
        }
    }

    async fn list(&self, _filter: &TaskFilter) -> Result<Vec<Task>, SourceError> {
        let path = format!("/repos/{}/issues?state=open&per_page=100", self.repo);
        let body = self
            .send(self.request(reqwest::Method::GET, &path), "list")
            .await
            .map_err(|e| SourceError::Read(e.to_string()))?;
        Ok(map_issue_list(&body))
    }

    async fn get(&self, id: &str) -> Result<Task, SourceError> {
        let number = Self::issue_number(id)?;
        let path = format!("/repos/{}/issues/{}", self.repo, number);
        let body = self
            .send(self.request(reqwest::Method::GET, &path), "get")
            .await
            .map_err(|e| SourceError::Read(e.to_string()))?;
        map_issue(&body).ok_or_else(|| SourceError::NotFound(id.to_string()))
    }

    async fn update(&self, id: &str, change: TaskChange) -> Result<(), SourceError> {
        let number = Self::issue_number(id)?;
        if let Some(status) = change.status {
            let state = match status {
                TaskStatus::Completed | TaskStatus::Cancelled => "closed",
                _ => "open",
            };
            let path = format!("/repos/{}/issues/{}", self.repo, number);
            self.send(
                self.request(reqwest::Method::PATCH, &path)
                    .json(&json!({ "state": state })),
                "update",
            )
            .await?;
        }
        if !change.add_labels.is_empty() {
            let path = format!("/repos/{}/issues/{}/labels", self.repo, number);
            self.send(
                self.request(reqwest::Method::POST, &path)
                    .json(&json!({ "labels": change.add_labels })),
                "labels",
            )
            .await?;
        }
        if let Some(ref comment) = change.comment {
            let path = format!("/repos/{}/issues/{}/comments", self.repo, number);
            self.send(
                self.request(reqwest::Method::POST, &path)
                    .json(&json!({ "body": comment })),
                "comment",
            )
            .await?;
        }
        Ok(())
    }

    async fn mark_complete(&self, id: &str) -> Result<(), SourceError> {
        self.update(
            id,
            TaskChange {
                status: Some(TaskStatus::Completed),
                ..Default::default()
            },
        )
        .await
    }

    async fn mark_blocked(&self, id: &str, reason: &str) -> Result<(), SourceError> {
        self.update(
            id,
            TaskChange {
                add_labels: vec!["blocked".to_string()],
                comment: Some(format!("Blocked: {}", reason)),
                ..Default::default()
            },
        )
        .await
    }
}

#[cfg(test)]
#[path = "github_tests.rs"]
mod tests;
