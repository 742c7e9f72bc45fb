// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Free TCP port allocation for embedded test servers
//!
//! Ports are handed out by advancing a shared cursor and probing each
//! candidate with a bind-then-close on the loopback interface. The probe
//! does not hold a reservation: another process may still grab the port
//! before the server binds it. That gap is accepted for test fixtures.

use std::net::{Ipv4Addr, TcpListener};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// First cursor value; the first candidate handed out is one above it
pub const DEFAULT_BASE_PORT: u16 = 2379;

/// Process-wide cursor backing [`PortAllocator::global`]
static GLOBAL_CURSOR: AtomicPortCursor = AtomicPortCursor::new(DEFAULT_BASE_PORT);

/// Errors from port allocation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortError {
    /// The cursor ran past the highest valid port. Nothing a retry can fix.
    #[error("no ports available for listening (cursor reached {last})")]
    Exhausted { last: u32 },
}

impl PortError {
    /// Whether the environment is unusable for further allocations
    pub fn is_fatal(&self) -> bool {
        matches!(self, PortError::Exhausted { .. })
    }
}

/// Monotonic source of candidate port numbers
pub trait PortCursor: Send + Sync {
    /// Advance the cursor by one and return the new value
    fn advance(&self) -> u32;
}

/// Lock-free cursor; the increment is the whole critical section
#[derive(Debug)]
pub struct AtomicPortCursor {
    last: AtomicU32,
}

impl AtomicPortCursor {
    pub const fn new(base: u16) -> Self {
        Self {
            last: AtomicU32::new(base as u32),
        }
    }

    /// Last value handed out (or the base, if nothing was)
    pub fn current(&self) -> u32 {
        self.last.load(Ordering::SeqCst)
    }
}

impl Default for AtomicPortCursor {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_PORT)
    }
}

impl PortCursor for AtomicPortCursor {
    fn advance(&self) -> u32 {
        self.last.fetch_add(1, Ordering::SeqCst).saturating_add(1)
    }
}

/// Delegates to the process-wide cursor
struct GlobalCursor;

impl PortCursor for GlobalCursor {
    fn advance(&self) -> u32 {
        GLOBAL_CURSOR.advance()
    }
}

/// Hands out locally free TCP ports
///
/// Clones share the same cursor, so ports handed out by any clone are
/// pairwise distinct.
#[derive(Clone)]
pub struct PortAllocator {
    cursor: Arc<dyn PortCursor>,
}

impl PortAllocator {
    pub fn new(cursor: impl PortCursor + 'static) -> Self {
        Self {
            cursor: Arc::new(cursor),
        }
    }

    /// Allocator with its own cursor starting at `base`
    pub fn starting_at(base: u16) -> Self {
        Self::new(AtomicPortCursor::new(base))
    }

    /// Allocator backed by the process-wide cursor
    pub fn global() -> Self {
        Self::new(GlobalCursor)
    }

    /// Return the next port that can currently be bound on 127.0.0.1
    pub fn allocate(&self) -> Result<u16, PortError> {
        loop {
            let candidate = self.cursor.advance();
            let Ok(port) = u16::try_from(candidate) else {
                tracing::error!(candidate, "no ports available for listening");
                return Err(PortError::Exhausted { last: candidate });
            };

            if is_port_free(port) {
                tracing::debug!(port, "allocated free port");
                return Ok(port);
            }
            tracing::trace!(port, "port in use");
        }
    }
}

impl Default for PortAllocator {
    fn default() -> Self {
        Self::global()
    }
}

impl std::fmt::Debug for PortAllocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortAllocator").finish_non_exhaustive()
    }
}

/// Bind and immediately release a listener on `127.0.0.1:port`
pub fn is_port_free(port: u16) -> bool {
    TcpListener::bind((Ipv4Addr::LOCALHOST, port)).is_ok()
}

#[cfg(test)]
#[path = "ports_tests.rs"]
mod tests;
