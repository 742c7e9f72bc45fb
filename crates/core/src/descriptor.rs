// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Connection descriptor handed to callers of a running instance

use std::net::SocketAddr;
use tokio_util::sync::CancellationToken;

/// Placeholder username for test instances
pub const FIXTURE_USER: &str = "user";

/// Placeholder password for test instances
pub const FIXTURE_PASS: &str = "pass";

/// How to reach a running instance.
///
/// Immutable after construction. The context token stays live until the
/// owning instance handle is stopped or dropped.
#[derive(Debug)]
pub struct ConnectionDescriptor {
    ctx: CancellationToken,
    host: String,
    user: String,
    pass: String,
    insecure_skip_verify: bool,
}

impl ConnectionDescriptor {
    /// Descriptor for peer-style connections to `peer_addr`.
    ///
    /// Transport verification is disabled; only meant for loopback test
    /// instances.
    pub fn for_peer(ctx: CancellationToken, peer_addr: SocketAddr) -> Self {
        Self {
            ctx,
            host: format!("http://{}", peer_addr),
            user: FIXTURE_USER.to_string(),
            pass: FIXTURE_PASS.to_string(),
            insecure_skip_verify: true,
        }
    }

    pub fn ctx(&self) -> &CancellationToken {
        &self.ctx
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn pass(&self) -> &str {
        &self.pass
    }

    pub fn insecure_skip_verify(&self) -> bool {
        self.insecure_skip_verify
    }
}

#[cfg(test)]
#[path = "descriptor_tests.rs"]
mod tests;
