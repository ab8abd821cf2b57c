// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `coders resume` - Clear a session's promise so it can be worked again

use crate::client::connect_store;
use anyhow::{Context, Result};
use clap::Args;
use coders_core::SessionId;
use coders_store::RecordsExt;

#[derive(Args)]
pub struct ResumeArgs {
    /// Session id (e.g. coder-claude-fix-login)
    pub session: String,
}

pub async fn run(args: ResumeArgs) -> Result<()> {
    let store = connect_store().await?;
    let session_id = SessionId::new(args.session);
    store.delete_promise(&session_id).await.context("resume")?;
    println!("promise cleared for {}", session_id);
    Ok(())
}
