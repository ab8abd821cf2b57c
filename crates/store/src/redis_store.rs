// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Redis-backed KV store.

use crate::{KvStore, StoreError, CONNECT_TIMEOUT, OP_TIMEOUT};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::time::Duration;

/// Redis client owning one connection manager per process.
#[derive(Clone)]
pub struct RedisStore {
    manager: ConnectionManager,
}

impl RedisStore {
    /// Connect to the store, bounded by [`CONNECT_TIMEOUT`].
    ///
    /// Failure here is [`StoreError::Unavailable`]; callers choose between
    /// degrading and aborting.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let client =
            redis::Client::open(url).map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let manager = tokio::time::timeout(CONNECT_TIMEOUT, client.get_connection_manager())
            .await
            .map_err(|_| StoreError::Unavailable(format!("connect to {} timed out", url)))?
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        Ok(Self { manager })
    }

    async fn bounded<T>(
        &self,
        what: &str,
        fut: impl std::future::Future<Output = redis::RedisResult<T>> + Send,
    ) -> Result<T, StoreError> {
        match tokio::time::timeout(OP_TIMEOUT, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(StoreError::Transient(format!("{}: {}", what, e))),
            Err(_) => Err(StoreError::Timeout(what.to_string())),
        }
    }
}

#[async_trait]
impl KvStore for RedisStore {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut con = self.manager.clone();
        let key = key.to_string();
        self.bounded("GET", async move { con.get(&key).await }).await
    }

    async fn set_raw(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut con = self.manager.clone();
        let key = key.to_string();
        let value = value.to_string();
        self.bounded("SET", async move { con.set(&key, &value).await })
            .await
    }

    async fn set_raw_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        let mut con = self.manager.clone();
        let key = key.to_string();
        let value = value.to_string();
        let secs = ttl.as_secs().max(1);
        self.bounded("SETEX", async move { con.set_ex(&key, &value, secs).await })
            .await
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut con = self.manager.clone();
        let key = key.to_string();
        self.bounded("DEL", async move { con.del(&key).await }).await
    }

    async fn scan(&self, pattern: &str) -> Result<Vec<String>, StoreError> {
        let mut con = self.manager.clone();
        let pattern = pattern.to_string();
        self.bounded("SCAN", async move {
            let mut keys = Vec::new();
            let mut cursor: u64 = 0;
            loop {
                let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                    .arg(cursor)
                    .arg("MATCH")
                    .arg(&pattern)
                    .arg("COUNT")
                    .arg(100)
                    .query_async(&mut con)
                    .await?;
                keys.extend(batch);
                cursor = next;
                if cursor == 0 {
                    break;
                }
            }
            Ok(keys)
        })
        .await
    }

    async fn mget_raw(&self, keys: &[String]) -> Result<Vec<Option<String>>, StoreError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        // MGET with a single key returns a scalar, so go through an explicit
        // command invocation that always yields an array.
        let mut con = self.manager.clone();
        let keys = keys.to_vec();
        self.bounded("MGET", async move {
            let mut cmd = redis::cmd("MGET");
            for key in &keys {
                cmd.arg(key);
            }
            cmd.query_async(&mut con).await
        })
        .await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let mut con = self.manager.clone();
        self.bounded("PING", async move {
            let reply: redis::RedisResult<String> = redis::cmd("PING").query_async(&mut con).await;
            reply.map(|_| ())
        })
        .await
    }
}
