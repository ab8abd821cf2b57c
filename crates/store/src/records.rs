// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed record accessors over any [`KvStore`].
//!
//! One method pair per entity, with the key namespace and TTL policy baked
//! in so writers cannot drift from `coders_core::keys`.

use crate::{KvStore, StoreError};
use async_trait::async_trait;
use coders_core::{
    keys, CrashEvent, HealthCheckResult, HealthCheckSummary, Heartbeat, LoopId, LoopNotification,
    LoopState, Promise, SessionId, SessionState,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

#[async_trait]
pub trait RecordsExt: KvStore {
    async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.get_raw(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn set_json<T: Serialize + Sync>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)?;
        self.set_raw(key, &raw).await
    }

    async fn set_json_ttl<T: Serialize + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)?;
        self.set_raw_ttl(key, &raw, ttl).await
    }

    // --- session state (writer: supervisor, then crash watcher) ---

    async fn get_session_state(
        &self,
        id: &SessionId,
    ) -> Result<Option<SessionState>, StoreError> {
        self.get_json(&keys::session_state(id)).await
    }

    async fn put_session_state(&self, state: &SessionState) -> Result<(), StoreError> {
        self.set_json(&keys::session_state(&state.session_id), state)
            .await
    }

    async fn delete_session_state(&self, id: &SessionId) -> Result<(), StoreError> {
        self.delete(&keys::session_state(id)).await
    }

    // --- heartbeats (writer: emitter) ---

    async fn get_heartbeat(&self, id: &SessionId) -> Result<Option<Heartbeat>, StoreError> {
        self.get_json(&keys::heartbeat(id)).await
    }

    async fn put_heartbeat(&self, heartbeat: &Heartbeat) -> Result<(), StoreError> {
        self.set_json_ttl(
            &keys::heartbeat(&heartbeat.session_id),
            heartbeat,
            keys::HEARTBEAT_TTL,
        )
        .await
    }

    // --- promises (writer: the assistant inside the session) ---

    async fn get_promise(&self, id: &SessionId) -> Result<Option<Promise>, StoreError> {
        self.get_json(&keys::promise(id)).await
    }

    async fn put_promise(&self, promise: &Promise) -> Result<(), StoreError> {
        self.set_json(&keys::promise(&promise.session_id), promise)
            .await
    }

    async fn delete_promise(&self, id: &SessionId) -> Result<(), StoreError> {
        self.delete(&keys::promise(id)).await
    }

    // --- health (writer: health checker) ---

    async fn get_health(&self, id: &SessionId) -> Result<Option<HealthCheckResult>, StoreError> {
        self.get_json(&keys::health(id)).await
    }

    async fn put_health(&self, result: &HealthCheckResult) -> Result<(), StoreError> {
        self.set_json_ttl(&keys::health(&result.session_id), result, keys::HEALTH_TTL)
            .await
    }

    async fn put_health_summary(&self, summary: &HealthCheckSummary) -> Result<(), StoreError> {
        self.set_json_ttl(keys::HEALTH_SUMMARY_KEY, summary, keys::HEALTH_SUMMARY_TTL)
            .await
    }

    async fn get_health_summary(&self) -> Result<Option<HealthCheckSummary>, StoreError> {
        self.get_json(keys::HEALTH_SUMMARY_KEY).await
    }

    // --- crash events (writer: crash watcher; append-only, not read back) ---

    async fn record_crash_event(&self, event: &CrashEvent) -> Result<(), StoreError> {
        self.set_json_ttl(
            &keys::crash_event(&event.session_id, event.timestamp),
            event,
            keys::CRASH_TTL,
        )
        .await
    }

    // --- loop state (writer: task loop) ---

    async fn get_loop_state(&self, id: &LoopId) -> Result<Option<LoopState>, StoreError> {
        self.get_json(&keys::loop_state(id)).await
    }

    async fn put_loop_state(&self, state: &LoopState) -> Result<(), StoreError> {
        self.set_json_ttl(&keys::loop_state(&state.loop_id), state, keys::LOOP_TTL)
            .await
    }

    async fn publish_loop_notification(
        &self,
        notification: &LoopNotification,
    ) -> Result<(), StoreError> {
        self.set_json_ttl(
            &keys::loop_notification(&notification.loop_id, notification.timestamp),
            notification,
            keys::LOOP_TTL,
        )
        .await
    }
}

impl<S: KvStore> RecordsExt for S {}

#[cfg(test)]
#[path = "records_tests.rs"]
mod tests;
