// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Source specification grammar: `type:k1=v1,k2=v2`.
//!
//! Specs round-trip exactly through `Display` because background loops
//! re-exec the current binary with their original arguments.

use crate::SourceError;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A parsed source specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    pub kind: String,
    pub params: BTreeMap<String, String>,
    /// Parameter declaration order, for exact round-tripping.
    order: Vec<String>,
}

impl SourceSpec {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            params: BTreeMap::new(),
            order: Vec::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        if !self.params.contains_key(&key) {
            self.order.push(key.clone());
        }
        self.params.insert(key, value.into());
        self
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Fetch a required parameter or fail with a spec error.
    pub fn require(&self, key: &str) -> Result<&str, SourceError> {
        self.param(key).ok_or_else(|| {
            SourceError::Spec(format!("{} source requires {}=<value>", self.kind, key))
        })
    }
}

impl FromStr for SourceSpec {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, rest) = s
            .split_once(':')
            .ok_or_else(|| SourceError::Spec(format!("missing ':' in source spec: {}", s)))?;

        if kind.is_empty() {
            return Err(SourceError::Spec(format!("empty source type: {}", s)));
        }

        let mut spec = SourceSpec::new(kind);
        for pair in rest.split(',').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                SourceError::Spec(format!("malformed key=value pair '{}' in: {}", pair, s))
            })?;
            if key.is_empty() {
                return Err(SourceError::Spec(format!(
                    "empty key in pair '{}' in: {}",
                    pair, s
                )));
            }
            spec = spec.with_param(key, value);
        }
        Ok(spec)
    }
}

impl fmt::Display for SourceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.kind)?;
        for (i, key) in self.order.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            let value = self.params.get(key).map(String::as_str).unwrap_or_default();
            write!(f, "{}={}", key, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "spec_tests.rs"]
mod tests;
