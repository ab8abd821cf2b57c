// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! coders-adapters: Effectful edges of the orchestrator.
//!
//! Everything that touches the outside world lives here behind a trait:
//! the terminal multiplexer, desktop notifications, subprocess execution,
//! and process-tree inspection.

pub mod env;
pub mod mux;
pub mod notify;
pub mod process;
pub mod subprocess;

pub use mux::{MuxAdapter, MuxError, MuxSession, TmuxMux};
pub use notify::{DesktopNotifyAdapter, NoOpNotifyAdapter, NotifyAdapter, NotifyError};

#[cfg(any(test, feature = "test-support"))]
pub use mux::{FakeMux, FakeMuxSession, MuxCall};
#[cfg(any(test, feature = "test-support"))]
pub use notify::{FakeNotifyAdapter, NotifyCall};
