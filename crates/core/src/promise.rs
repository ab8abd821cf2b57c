// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Promises: terminal records the assistant publishes when its task is done.
//!
//! A promise is written exactly once per logical task attempt and gates the
//! task loop. Deleting a session's promise "resumes" it.

use crate::SessionId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Terminal status declared by the assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PromiseStatus {
    Completed,
    Blocked,
    NeedsReview,
}

impl fmt::Display for PromiseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PromiseStatus::Completed => "completed",
            PromiseStatus::Blocked => "blocked",
            PromiseStatus::NeedsReview => "needs-review",
        };
        write!(f, "{}", s)
    }
}

/// Error for an unknown promise status.
#[derive(Debug, thiserror::Error)]
#[error("unknown promise status: {0} (expected completed, blocked, or needs-review)")]
pub struct UnknownPromiseStatus(pub String);

impl FromStr for PromiseStatus {
    type Err = UnknownPromiseStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completed" => Ok(PromiseStatus::Completed),
            "blocked" => Ok(PromiseStatus::Blocked),
            "needs-review" => Ok(PromiseStatus::NeedsReview),
            other => Err(UnknownPromiseStatus(other.to_string())),
        }
    }
}

/// The record published under `coders:promise:<session>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Promise {
    pub session_id: SessionId,
    pub timestamp: u64,
    pub summary: String,
    pub status: PromiseStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blockers: Vec<String>,
}

#[cfg(test)]
#[path = "promise_tests.rs"]
mod tests;
