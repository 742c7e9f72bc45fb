// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Teardown handle for a running instance

use crate::FixtureError;
use ef_adapters::ServerInstance;
use std::fmt;
use std::net::SocketAddr;
use tokio_util::sync::CancellationToken;

/// Lifecycle of one instance
///
/// `Unstarted -> Starting -> {Ready, Failed, TimedOut}`, then
/// `Ready -> Stopped`. Failed and TimedOut never produce a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceState {
    Unstarted,
    Starting,
    Ready,
    Failed,
    TimedOut,
    Stopped,
}

impl InstanceState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            InstanceState::Failed | InstanceState::TimedOut | InstanceState::Stopped
        )
    }
}

impl fmt::Display for InstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InstanceState::Unstarted => "unstarted",
            InstanceState::Starting => "starting",
            InstanceState::Ready => "ready",
            InstanceState::Failed => "failed",
            InstanceState::TimedOut => "timed_out",
            InstanceState::Stopped => "stopped",
        };
        write!(f, "{}", s)
    }
}

/// Owns a ready instance until it is stopped.
///
/// `stop()` cancels the descriptor context and closes the instance. Only the
/// first call does anything. Dropping a handle without stopping it cancels
/// the context and leaves shutdown to the instance's own drop.
pub struct InstanceHandle<I: ServerInstance> {
    instance: Option<I>,
    cancel: CancellationToken,
    name: String,
    client_addr: SocketAddr,
    peer_addr: SocketAddr,
}

impl<I: ServerInstance> InstanceHandle<I> {
    pub(crate) fn new(
        instance: I,
        cancel: CancellationToken,
        name: String,
        client_addr: SocketAddr,
        peer_addr: SocketAddr,
    ) -> Self {
        Self {
            instance: Some(instance),
            cancel,
            name,
            client_addr,
            peer_addr,
        }
    }

    /// Member name given to the instance
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn client_addr(&self) -> SocketAddr {
        self.client_addr
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    pub fn state(&self) -> InstanceState {
        if self.instance.is_some() {
            InstanceState::Ready
        } else {
            InstanceState::Stopped
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.instance.is_none()
    }

    /// Running instance, until stopped
    pub fn instance(&self) -> Option<&I> {
        self.instance.as_ref()
    }

    /// Cancel the descriptor context, then close the instance
    pub async fn stop(&mut self) -> Result<(), FixtureError> {
        let Some(mut instance) = self.instance.take() else {
            tracing::debug!(name = %self.name, "already stopped");
            return Ok(());
        };

        self.cancel.cancel();
        instance.close().await.map_err(FixtureError::Stop)?;

        tracing::info!(name = %self.name, state = %InstanceState::Stopped, "instance stopped");
        Ok(())
    }
}

impl<I: ServerInstance> Drop for InstanceHandle<I> {
    fn drop(&mut self) {
        if self.instance.is_some() {
            self.cancel.cancel();
            tracing::warn!(name = %self.name, "instance handle dropped without stop");
        }
    }
}

impl<I: ServerInstance> fmt::Debug for InstanceHandle<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceHandle")
            .field("name", &self.name)
            .field("client_addr", &self.client_addr)
            .field("peer_addr", &self.peer_addr)
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
#[path = "handle_tests.rs"]
mod tests;
