// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Desktop notifications via notify-rust.
//!
//! Loop workers run detached from any terminal, which trips a macOS quirk:
//! `mac-notification-sys` looks up a bundle identifier with an AppleScript
//! the first time a notification is sent, and without Automation
//! permissions that script never returns. Setting the identifier up front
//! skips the lookup entirely.

use super::{NotifyAdapter, NotifyError};
use async_trait::async_trait;

#[derive(Clone, Copy, Debug, Default)]
pub struct DesktopNotifyAdapter;

impl DesktopNotifyAdapter {
    pub fn new() -> Self {
        #[cfg(target_os = "macos")]
        {
            // Must happen before the first show(); see module docs.
            let _ = mac_notification_sys::set_application("com.apple.Terminal");
        }
        Self
    }
}

#[async_trait]
impl NotifyAdapter for DesktopNotifyAdapter {
    async fn notify(&self, title: &str, message: &str) -> Result<(), NotifyError> {
        // show() blocks on macOS, so hand it to the blocking pool and
        // return without waiting. A lost notification is not worth
        // stalling a loop tick over, so failures only log.
        let notification = {
            let mut n = notify_rust::Notification::new();
            n.summary(title).body(message);
            n
        };
        let title = title.to_string();
        tokio::task::spawn_blocking(move || match notification.show() {
            Ok(_) => tracing::debug!(%title, "desktop notification delivered"),
            Err(e) => tracing::warn!(%title, error = %e, "desktop notification failed"),
        });
        Ok(())
    }
}
