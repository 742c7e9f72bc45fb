// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Startup and fixture configuration

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How long a started instance has to report readiness
pub const DEFAULT_READY_TIMEOUT: Duration = Duration::from_secs(10);

/// Ceiling on operations per transaction, high enough for bulk test writes
pub const MAX_TXN_OPS: u32 = 8192;

/// Ceiling on a single request payload (16 MiB)
pub const MAX_REQUEST_BYTES: u64 = 16384 * 1024;

/// Everything the embedded server needs to launch one instance.
///
/// Built fresh for every start and dropped once the server is running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupConfig {
    /// Member name, unique per instance
    pub name: String,
    /// Storage directory owned by the instance
    pub data_dir: PathBuf,
    /// Client-facing listen address
    pub client_addr: SocketAddr,
    /// Peer-facing listen address
    pub peer_addr: SocketAddr,
    pub max_txn_ops: u32,
    pub max_request_bytes: u64,
}

impl StartupConfig {
    pub fn new(
        name: impl Into<String>,
        data_dir: &Path,
        client_addr: SocketAddr,
        peer_addr: SocketAddr,
    ) -> Self {
        Self {
            name: name.into(),
            data_dir: data_dir.to_path_buf(),
            client_addr,
            peer_addr,
            max_txn_ops: MAX_TXN_OPS,
            max_request_bytes: MAX_REQUEST_BYTES,
        }
    }

    pub fn client_url(&self) -> String {
        format!("http://{}", self.client_addr)
    }

    pub fn peer_url(&self) -> String {
        format!("http://{}", self.peer_addr)
    }
}

/// Settings for the instance manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureConfig {
    /// Bound on the readiness wait
    pub ready_timeout: Duration,
    /// Prefix for generated member names
    pub name_prefix: String,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            ready_timeout: DEFAULT_READY_TIMEOUT,
            name_prefix: "fixture".to_string(),
        }
    }
}

impl FixtureConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ready_timeout(mut self, timeout: Duration) -> Self {
        self.ready_timeout = timeout;
        self
    }

    pub fn with_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name_prefix = prefix.into();
        self
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
