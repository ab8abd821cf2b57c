// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! coders-store: KV-store client for shared orchestrator state.
//!
//! All cross-process state lives in the store as UTF-8 JSON under the
//! `coders:` namespace; there is no other channel between components.
//! Records are single-writer by design (see `coders_core::keys`), so the
//! client needs no locking beyond one connection per process.

mod records;
mod redis_store;

pub use records::RecordsExt;
pub use redis_store::RedisStore;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod memory;
#[cfg(any(test, feature = "test-support"))]
pub use memory::MemoryStore;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Per-operation deadline. Store calls are never allowed to hang a tick loop.
pub const OP_TIMEOUT: Duration = Duration::from_secs(3);

/// Deadline for the initial connection.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors from store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached at startup. Callers decide whether to
    /// degrade (supervisor) or abort (promise publisher, health checker).
    #[error("store unavailable: {0} (check CODERS_REDIS_URL)")]
    Unavailable(String),
    #[error("store operation timed out: {0}")]
    Timeout(String),
    /// Safe to retry on the next tick.
    #[error("transient store error: {0}")]
    Transient(String),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Raw string surface of the KV store.
///
/// Typed accessors live in [`RecordsExt`]; implementations only deal in
/// strings and TTLs.
#[async_trait]
pub trait KvStore: Clone + Send + Sync + 'static {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set_raw(&self, key: &str, value: &str) -> Result<(), StoreError>;

    async fn set_raw_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError>;

    async fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Keys matching a glob-style pattern (e.g. `coders:promise:*`).
    async fn scan(&self, pattern: &str) -> Result<Vec<String>, StoreError>;

    async fn mget_raw(&self, keys: &[String]) -> Result<Vec<Option<String>>, StoreError>;

    /// Round-trip connectivity check.
    async fn ping(&self) -> Result<(), StoreError>;
}
