// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Embedded coordination server adapters

mod etcd;

pub use etcd::{EtcdAdapter, EtcdInstance};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeBehavior, FakeServerAdapter, FakeServerInstance, ServerCall};

use async_trait::async_trait;
use ef_core::StartupConfig;
use thiserror::Error;

/// Errors from server operations
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("spawn failed: {0}")]
    SpawnFailed(String),
    #[error("server exited before becoming ready")]
    ExitedBeforeReady,
    #[error("command failed: {0}")]
    CommandFailed(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// Launches embedded server instances
#[async_trait]
pub trait ServerAdapter: Clone + Send + Sync + 'static {
    type Instance: ServerInstance;

    /// Launch one instance. May block briefly while the server sets up.
    async fn start(&self, config: &StartupConfig) -> Result<Self::Instance, ServerError>;
}

/// A launched instance
#[async_trait]
pub trait ServerInstance: Send + Sync + 'static {
    /// Resolve once the instance reports it is serving.
    ///
    /// Never polls; waits on the instance's own notification.
    async fn ready(&mut self) -> Result<(), ServerError>;

    /// Shut the instance down. Calling again after a close is a no-op.
    async fn close(&mut self) -> Result<(), ServerError>;
}
