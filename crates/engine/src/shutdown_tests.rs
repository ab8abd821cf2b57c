// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Duration;

#[tokio::test]
async fn trigger_cancels() {
    let (handle, token) = Shutdown::new();
    assert!(!token.is_cancelled());
    handle.trigger();
    assert!(token.is_cancelled());
    // Must resolve promptly
    tokio::time::timeout(Duration::from_secs(1), token.cancelled())
        .await
        .unwrap();
}

#[tokio::test]
async fn cancelled_waits_until_trigger() {
    let (handle, token) = Shutdown::new();
    let waiter = tokio::spawn({
        let token = token.clone();
        async move {
            token.cancelled().await;
        }
    });
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(!waiter.is_finished());
    handle.trigger();
    tokio::time::timeout(Duration::from_secs(1), waiter)
        .await
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn clones_observe_same_trigger() {
    let (handle, token) = Shutdown::new();
    let other = token.clone();
    handle.trigger();
    assert!(other.is_cancelled());
}
