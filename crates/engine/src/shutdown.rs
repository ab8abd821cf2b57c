// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cooperative shutdown signal shared by every long-running loop.
//!
//! Loops race their tick sleep against [`Shutdown::cancelled`]; on
//! SIGINT/SIGTERM they finish the in-flight store write and exit.

use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::watch;

/// Cloneable cancellation token.
#[derive(Clone)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

/// The sending half; dropping it does NOT trigger shutdown.
pub struct ShutdownHandle {
    tx: watch::Sender<bool>,
}

impl ShutdownHandle {
    pub fn trigger(&self) {
        let _ = self.tx.send(true);
    }
}

impl Shutdown {
    /// A token pair for manual control (tests, nested loops).
    pub fn new() -> (ShutdownHandle, Shutdown) {
        let (tx, rx) = watch::channel(false);
        (ShutdownHandle { tx }, Shutdown { rx })
    }

    /// A token triggered by SIGINT or SIGTERM.
    ///
    /// Installing the handlers can only fail if the runtime has no signal
    /// driver; that is a programming error surfaced as io::Error.
    pub fn install_signals() -> std::io::Result<Shutdown> {
        let (handle, token) = Shutdown::new();
        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;
        tokio::spawn(async move {
            tokio::select! {
                _ = sigint.recv() => tracing::info!("received SIGINT, shutting down"),
                _ = sigterm.recv() => tracing::info!("received SIGTERM, shutting down"),
            }
            handle.trigger();
        });
        Ok(token)
    }

    /// Whether shutdown has been requested.
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve when shutdown is requested. Safe to use in `select!` arms.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        if *rx.borrow() {
            return;
        }
        // An error means the sender is gone; treat as "never cancelled"
        // and park forever rather than spinning.
        while rx.changed().await.is_ok() {
            if *rx.borrow() {
                return;
            }
        }
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
#[path = "shutdown_tests.rs"]
mod tests;
