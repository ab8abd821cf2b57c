// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session identifiers and the task-slug grammar.
//!
//! Every session the orchestrator creates is named `coder-<tool>-<slug>`,
//! where the slug is derived from the task text. Consumers treat any
//! multiplexer session starting with `coder-` as in-scope and everything
//! else as out of scope.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reserved multiplexer-session prefix for orchestrator-managed sessions.
pub const SESSION_PREFIX: &str = "coder-";

/// Maximum length of the task-derived slug component.
const SLUG_MAX_LEN: usize = 30;

/// Session-name component reserved for human-driven orchestrator sessions.
///
/// The health checker treats these as healthy even without a heartbeat.
pub const ORCHESTRATOR_NAME: &str = "orchestrator";

/// Unique identifier for one managed session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derive the id for a task run by a given tool.
    ///
    /// `now_unix_secs` feeds the timestamp fallback for empty slugs and is
    /// passed in so callers control the clock.
    pub fn for_task(tool: crate::Tool, task: &str, now_unix_secs: u64) -> Self {
        Self(format!(
            "{}{}",
            SESSION_PREFIX,
            session_name(tool, task, now_unix_secs)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this id belongs to the orchestrator namespace.
    pub fn is_managed(&self) -> bool {
        self.0.starts_with(SESSION_PREFIX)
    }

    /// Whether this is a human-driven orchestrator session.
    pub fn is_orchestrator(&self) -> bool {
        self.0
            .strip_prefix(SESSION_PREFIX)
            .is_some_and(|name| name.starts_with(ORCHESTRATOR_NAME))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::borrow::Borrow<str> for SessionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Build the session-name component for a tool and task.
///
/// `<tool>-<slug>` normally; when the task slugs to nothing the name falls
/// back to `<tool>-<unix_seconds mod 10000>` so ids stay unique and typable.
pub fn session_name(tool: crate::Tool, task: &str, now_unix_secs: u64) -> String {
    let slug = slugify(task);
    if slug.is_empty() {
        format!("{}-{}", tool, now_unix_secs % 10000)
    } else {
        format!("{}-{}", tool, slug)
    }
}

/// Kebab-case a task description into a session slug.
///
/// Lowercases, keeps ASCII alphanumerics, collapses every run of other
/// characters to a single hyphen, trims the ends, and truncates to 30
/// characters (never leaving a trailing hyphen). Idempotent.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut last_was_hyphen = false;
    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen && !slug.is_empty() {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    let trimmed = slug.trim_end_matches('-');
    if trimmed.len() != slug.len() {
        slug.truncate(trimmed.len());
    }

    if slug.len() > SLUG_MAX_LEN {
        slug.truncate(SLUG_MAX_LEN);
        let trimmed = slug.trim_end_matches('-');
        if trimmed.len() != slug.len() {
            slug.truncate(trimmed.len());
        }
    }

    slug
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
