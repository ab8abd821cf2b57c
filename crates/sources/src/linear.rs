// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Linear issue-tracker source (GraphQL).

use crate::{SourceError, SourceInfo, TaskSource};
use async_trait::async_trait;
use coders_core::{clamp_priority, Task, TaskChange, TaskFilter, TaskStatus};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::time::Duration;

const LINEAR_ENDPOINT: &str = "https://api.linear.app/graphql";

const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

const LIST_QUERY: &str = r#"
query Issues($filter: IssueFilter) {
  issues(filter: $filter, first: 100) {
    nodes {
      id
      identifier
      title
      description
      priority
      state { name type }
      assignee { displayName }
      labels { nodes { name } }
    }
  }
}"#;

const GET_QUERY: &str = r#"
query Issue($id: String!) {
  issue(id: $id) {
    id
    identifier
    title
    description
    priority
    state { name type }
    assignee { displayName }
    labels { nodes { name } }
  }
}"#;

const COMPLETED_STATE_QUERY: &str = r#"
query States {
  workflowStates(filter: { type: { eq: "completed" } }, first: 1) {
    nodes { id }
  }
}"#;

const UPDATE_STATE_MUTATION: &str = r#"
mutation Update($id: String!, $stateId: String!) {
  issueUpdate(id: $id, input: { stateId: $stateId }) { success }
}"#;

const COMMENT_MUTATION: &str = r#"
mutation Comment($issueId: String!, $body: String!) {
  commentCreate(input: { issueId: $issueId, body: $body }) { success }
}"#;

/// Linear source (`linear:key=<api-key>[,team=<team-key>]`).
pub struct LinearSource {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    team: Option<String>,
}

impl LinearSource {
    pub fn new(api_key: impl Into<String>, team: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: LINEAR_ENDPOINT.to_string(),
            api_key: api_key.into(),
            team,
        }
    }

    /// Point at a non-default endpoint (self-hosted proxies, tests).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    async fn graphql(&self, query: &str, variables: Value) -> Result<Value, SourceError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", &self.api_key)
            .header("Content-Type", "application/json")
            .timeout(HTTP_TIMEOUT)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .map_err(|e| SourceError::Unavailable(format!("linear: {}", e)))?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| SourceError::Read(format!("linear response: {}", e)))?;

        if !status.is_success() {
            return Err(SourceError::Read(format!(
                "linear returned {}: {}",
                status, body
            )));
        }
        if let Some(errors) = body.get("errors").and_then(Value::as_array) {
            if !errors.is_empty() {
                return Err(SourceError::Read(format!("linear errors: {}", errors[0])));
            }
        }
        Ok(body)
    }

    async fn completed_state_id(&self) -> Result<String, SourceError> {
        let body = self.graphql(COMPLETED_STATE_QUERY, json!({})).await?;
        body.pointer("/data/workflowStates/nodes/0/id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| SourceError::Write("linear has no completed workflow state".to_string()))
    }
}

/// Map a Linear workflow-state type onto the normalized status set.
fn map_state_type(state_type: &str) -> TaskStatus {
    match state_type {
        "started" => TaskStatus::InProgress,
        "completed" => TaskStatus::Completed,
        "canceled" => TaskStatus::Cancelled,
        // backlog, unstarted, triage, and anything Linear adds later
        _ => TaskStatus::Open,
    }
}

/// Map one issue node. Nodes missing the required fields are dropped.
fn map_issue_node(node: &Value) -> Option<Task> {
    let id = node.get("id")?.as_str()?.to_string();
    let title = node.get("title")?.as_str()?.to_string();
    let identifier = node
        .get("identifier")
        .and_then(Value::as_str)
        .unwrap_or(&id)
        .to_string();
    let state_type = node
        .pointer("/state/type")
        .and_then(Value::as_str)
        .unwrap_or("");
    let labels: Vec<String> = node
        .pointer("/labels/nodes")
        .and_then(Value::as_array)
        .map(|nodes| {
            nodes
                .iter()
                .filter_map(|l| l.get("name").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let mut metadata = BTreeMap::new();
    metadata.insert("identifier".to_string(), identifier);

    Some(Task {
        id: id.clone(),
        title,
        description: node
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        status: map_state_type(state_type),
        priority: clamp_priority(node.get("priority").and_then(Value::as_i64).unwrap_or(2)),
        source: "linear".to_string(),
        origin_id: id,
        metadata,
        created_at: None,
        updated_at: None,
        assignee: node
            .pointer("/assignee/displayName")
            .and_then(Value::as_str)
            .map(str::to_string),
        labels,
        blocked_by: Vec::new(),
        blocks: Vec::new(),
    })
}

fn map_issue_list(body: &Value) -> Vec<Task> {
    body.pointer("/data/issues/nodes")
        .and_then(Value::as_array)
        .map(|nodes| nodes.iter().filter_map(map_issue_node).collect())
        .unwrap_or_default()
}

#[async_trait]
impl TaskSource for LinearSource {
    fn info(&self) -> SourceInfo {
        SourceInfo {
            kind: "linear",
            label: self.team.clone().unwrap_or_else(|| "linear".to_string()),
        }
    }

    async fn list(&self, _filter: &TaskFilter) -> Result<Vec<Task>, SourceError> {
        let filter = match &self.team {
            Some(team) => json!({ "team": { "key": { "eq": team } } }),
            None => Value::Null,
        };
        let body = self.graphql(LIST_QUERY, json!({ "filter": filter })).await?;
        Ok(map_issue_list(&body))
    }

    async fn get(&self, id: &str) -> Result<Task, SourceError> {
        let body = self.graphql(GET_QUERY, json!({ "id": id })).await?;
        body.pointer("/data/issue")
            .and_then(map_issue_node)
            .ok_or_else(|| SourceError::NotFound(id.to_string()))
    }

    async fn update(&self, id: &str, change: TaskChange) -> Result<(), SourceError> {
        if change.status == Some(TaskStatus::Completed) {
            self.mark_complete(id).await?;
        }
        if let Some(ref comment) = change.comment {
            self.graphql(
                COMMENT_MUTATION,
                json!({ "issueId": id, "body": comment }),
            )
            .await?;
        }
        Ok(())
    }

    async fn mark_complete(&self, id: &str) -> Result<(), SourceError> {
        let state_id = self.completed_state_id().await?;
        let body = self
            .graphql(
                UPDATE_STATE_MUTATION,
                json!({ "id": id, "stateId": state_id }),
            )
            .await?;
        match body.pointer("/data/issueUpdate/success").and_then(Value::as_bool) {
            Some(true) => Ok(()),
            _ => Err(SourceError::Write(format!("linear issueUpdate failed for {}", id))),
        }
    }

    async fn mark_blocked(&self, id: &str, reason: &str) -> Result<(), SourceError> {
        let body = self
            .graphql(
                COMMENT_MUTATION,
                json!({ "issueId": id, "body": format!("Blocked: {}", reason) }),
            )
            .await?;
        match body.pointer("/data/commentCreate/success").and_then(Value::as_bool) {
            Some(true) => Ok(()),
            _ => Err(SourceError::Write(format!("linear commentCreate failed for {}", id))),
        }
    }
}

#[cfg(test)]
#[path = "linear_tests.rs"]
mod tests;
