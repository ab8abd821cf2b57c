// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the orchestration engine

use coders_adapters::MuxError;
use coders_sources::SourceError;
use coders_store::StoreError;
use thiserror::Error;

/// Errors that can occur in the engine.
///
/// Call sites apply the propagation policy: the supervisor surfaces config,
/// conflict, and directory errors but downgrades readiness timeouts and
/// worker-fork failures to warnings; the crash watcher surfaces nothing.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),
    #[error("dependency unavailable: {0}")]
    DependencyUnavailable(String),
    #[error("session already exists: {0}")]
    SessionConflict(String),
    #[error("directory not found: {0}")]
    DirectoryNotFound(String),
    #[error("tool not ready within {0}s")]
    ReadinessTimeout(u64),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Mux(#[from] MuxError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
