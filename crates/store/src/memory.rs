// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory KV store for testing
//!
//! Honors TTLs through an injected clock so expiry is testable without
//! sleeping.
#![cfg_attr(coverage_nightly, coverage(off))]

use crate::{KvStore, StoreError};
use async_trait::async_trait;
use coders_core::{Clock, SystemClock};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
struct Entry {
    value: String,
    /// Epoch ms past which the entry is gone. `None` = no TTL.
    expires_at: Option<u64>,
}

/// In-memory KV store for tests.
#[derive(Clone)]
pub struct MemoryStore<C: Clock = SystemClock> {
    entries: Arc<Mutex<BTreeMap<String, Entry>>>,
    clock: C,
    unavailable: Arc<Mutex<bool>>,
}

impl MemoryStore<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for MemoryStore<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> MemoryStore<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            entries: Arc::new(Mutex::new(BTreeMap::new())),
            clock,
            unavailable: Arc::new(Mutex::new(false)),
        }
    }

    /// Make every subsequent call fail with a transient error.
    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.lock() = unavailable;
    }

    /// All live keys, in order.
    pub fn keys(&self) -> Vec<String> {
        let now = self.clock.now_ms();
        self.entries
            .lock()
            .iter()
            .filter(|(_, e)| e.expires_at.is_none_or(|at| at > now))
            .map(|(k, _)| k.clone())
            .collect()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if *self.unavailable.lock() {
            Err(StoreError::Transient("store marked unavailable".to_string()))
        } else {
            Ok(())
        }
    }

    fn live_value(&self, key: &str) -> Option<String> {
        let now = self.clock.now_ms();
        let entries = self.entries.lock();
        entries.get(key).and_then(|e| {
            if e.expires_at.is_none_or(|at| at > now) {
                Some(e.value.clone())
            } else {
                None
            }
        })
    }
}

#[async_trait]
impl<C: Clock> KvStore for MemoryStore<C> {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.check_available()?;
        Ok(self.live_value(key))
    }

    async fn set_raw(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.check_available()?;
        self.entries.lock().insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: None,
            },
        );
        Ok(())
    }

    async fn set_raw_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        self.check_available()?;
        self.entries.lock().insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Some(self.clock.now_ms() + ttl.as_millis() as u64),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.check_available()?;
        self.entries.lock().remove(key);
        Ok(())
    }

    async fn scan(&self, pattern: &str) -> Result<Vec<String>, StoreError> {
        self.check_available()?;
        let now = self.clock.now_ms();
        Ok(self
            .entries
            .lock()
            .iter()
            .filter(|(_, e)| e.expires_at.is_none_or(|at| at > now))
            .filter(|(k, _)| glob_match(pattern, k))
            .map(|(k, _)| k.clone())
            .collect())
    }

    async fn mget_raw(&self, keys: &[String]) -> Result<Vec<Option<String>>, StoreError> {
        self.check_available()?;
        Ok(keys.iter().map(|k| self.live_value(k)).collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_available()
    }
}

/// Minimal glob matching: only `*` wildcards, which is all the key
/// namespace uses.
fn glob_match(pattern: &str, key: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();
    if parts.len() == 1 {
        return pattern == key;
    }
    let mut rest = key;
    for (i, part) in parts.iter().enumerate() {
        if part.is_empty() {
            continue;
        }
        if i == 0 {
            match rest.strip_prefix(part) {
                Some(r) => rest = r,
                None => return false,
            }
        } else if i == parts.len() - 1 {
            return rest.ends_with(part);
        } else {
            match rest.find(part) {
                Some(at) => rest = &rest[at + part.len()..],
                None => return false,
            }
        }
    }
    true
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
