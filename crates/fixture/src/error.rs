// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for starting fixture instances

use ef_adapters::ServerError;
use ef_core::PortError;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while starting or stopping an instance
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("port allocation failed: {0}")]
    Ports(#[from] PortError),
    #[error("launch failed: {0}")]
    Launch(#[from] ServerError),
    #[error("etcd failed to start after: {}", humanize(.timeout))]
    ReadinessTimeout { timeout: Duration },
    #[error("stop failed: {0}")]
    Stop(ServerError),
}

impl FixtureError {
    /// True when the environment cannot host any more instances.
    ///
    /// Callers decide whether to abort the process.
    pub fn is_fatal(&self) -> bool {
        match self {
            FixtureError::Ports(e) => e.is_fatal(),
            FixtureError::Launch(_)
            | FixtureError::ReadinessTimeout { .. }
            | FixtureError::Stop(_) => false,
        }
    }
}

fn humanize(duration: &Duration) -> humantime::FormattedDuration {
    humantime::format_duration(*duration)
}
