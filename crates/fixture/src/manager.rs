// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Instance manager: allocate ports, launch, wait for readiness.

use crate::handle::{InstanceHandle, InstanceState};
use crate::FixtureError;
use ef_adapters::{EtcdAdapter, EtcdInstance, ServerAdapter, ServerInstance};
use ef_adapters::{TracedServerAdapter, TracedServerInstance};
use ef_core::{ConnectionDescriptor, FixtureConfig, PortAllocator, StartupConfig};
use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

/// Manager over the real etcd binary, with tracing
pub type EtcdFixture = InstanceManager<TracedServerAdapter<EtcdAdapter>>;

/// Handle type returned by [`EtcdFixture`]
pub type EtcdHandle = InstanceHandle<TracedServerInstance<EtcdInstance>>;

/// Starts embedded server instances for tests
#[derive(Debug)]
pub struct InstanceManager<S> {
    adapter: S,
    ports: PortAllocator,
    config: FixtureConfig,
}

impl<S: ServerAdapter> InstanceManager<S> {
    /// Manager using the process-wide port cursor and default config
    pub fn new(adapter: S) -> Self {
        Self {
            adapter,
            ports: PortAllocator::global(),
            config: FixtureConfig::default(),
        }
    }

    pub fn with_config(mut self, config: FixtureConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_allocator(mut self, ports: PortAllocator) -> Self {
        self.ports = ports;
        self
    }

    pub fn config(&self) -> &FixtureConfig {
        &self.config
    }

    pub fn adapter(&self) -> &S {
        &self.adapter
    }

    /// Start one instance rooted at `storage_dir` and wait until it serves.
    ///
    /// On any failure after launch the instance is closed before the error
    /// is returned, so no partially started instance escapes.
    pub async fn start_instance(
        &self,
        storage_dir: &Path,
    ) -> Result<(ConnectionDescriptor, InstanceHandle<S::Instance>), FixtureError> {
        tracing::debug!(
            state = %InstanceState::Unstarted,
            storage_dir = %storage_dir.display(),
            "allocating ports"
        );

        // Two separate allocations; the cursor never repeats a value
        let client_addr = loopback(self.ports.allocate()?);
        let peer_addr = loopback(self.ports.allocate()?);

        let name = format!("{}-{}", self.config.name_prefix, Uuid::new_v4().simple());
        let startup = StartupConfig::new(name, storage_dir, client_addr, peer_addr);

        let span = tracing::info_span!("instance.start", name = %startup.name);
        self.launch(startup).instrument(span).await
    }

    async fn launch(
        &self,
        startup: StartupConfig,
    ) -> Result<(ConnectionDescriptor, InstanceHandle<S::Instance>), FixtureError> {
        tracing::debug!(
            state = %InstanceState::Starting,
            client = %startup.client_addr,
            peer = %startup.peer_addr,
            "launching"
        );

        let mut instance = self.adapter.start(&startup).await.map_err(|e| {
            tracing::error!(state = %InstanceState::Failed, error = %e, "launch failed");
            FixtureError::Launch(e)
        })?;

        let timeout = self.config.ready_timeout;
        let start = Instant::now();
        let ready = tokio::time::timeout(timeout, instance.ready()).await;
        match ready {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::error!(state = %InstanceState::Failed, error = %e, "instance failed before ready");
                close_after_failure(&mut instance).await;
                return Err(FixtureError::Launch(e));
            }
            Err(_) => {
                tracing::error!(
                    state = %InstanceState::TimedOut,
                    timeout_ms = timeout.as_millis() as u64,
                    "instance not ready in time"
                );
                close_after_failure(&mut instance).await;
                return Err(FixtureError::ReadinessTimeout { timeout });
            }
        }

        let cancel = CancellationToken::new();
        let descriptor = ConnectionDescriptor::for_peer(cancel.child_token(), startup.peer_addr);

        tracing::info!(
            state = %InstanceState::Ready,
            host = descriptor.host(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "instance ready"
        );

        let handle = InstanceHandle::new(
            instance,
            cancel,
            startup.name,
            startup.client_addr,
            startup.peer_addr,
        );
        Ok((descriptor, handle))
    }
}

impl EtcdFixture {
    /// Manager over the `etcd` binary found on `PATH`
    pub fn etcd() -> Self {
        InstanceManager::new(TracedServerAdapter::new(EtcdAdapter::new()))
    }
}

/// Start an etcd instance with default settings
pub async fn start_etcd(
    storage_dir: &Path,
) -> Result<(ConnectionDescriptor, EtcdHandle), FixtureError> {
    EtcdFixture::etcd().start_instance(storage_dir).await
}

fn loopback(port: u16) -> SocketAddr {
    SocketAddr::from((Ipv4Addr::LOCALHOST, port))
}

/// Best-effort close of an instance that will never be handed out
async fn close_after_failure<I: ServerInstance>(instance: &mut I) {
    if let Err(e) = instance.close().await {
        tracing::warn!(error = %e, "failed to close instance after failed start");
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
