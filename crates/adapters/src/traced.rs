// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::server::{ServerAdapter, ServerError, ServerInstance};
use async_trait::async_trait;
use ef_core::StartupConfig;
use std::time::Instant;
use tracing::Instrument;

/// Wrapper that adds tracing to any ServerAdapter
#[derive(Clone)]
pub struct TracedServerAdapter<S> {
    inner: S,
}

impl<S> TracedServerAdapter<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S: ServerAdapter> ServerAdapter for TracedServerAdapter<S> {
    type Instance = TracedServerInstance<S::Instance>;

    async fn start(&self, config: &StartupConfig) -> Result<Self::Instance, ServerError> {
        let span = tracing::info_span!(
            "server.start",
            name = %config.name,
            data_dir = %config.data_dir.display()
        );

        async {
            tracing::info!(
                client = %config.client_addr,
                peer = %config.peer_addr,
                "starting"
            );

            // Precondition: the server creates the data dir, but not its parents
            if let Some(parent) = config.data_dir.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    tracing::error!(parent = %parent.display(), "parent directory does not exist");
                    return Err(ServerError::InvalidConfig(format!(
                        "parent directory does not exist: {}",
                        parent.display()
                    )));
                }
            }

            let start = Instant::now();
            let result = self.inner.start(config).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(_) => tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "launched"),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "launch failed"
                ),
            }

            result.map(|inner| TracedServerInstance {
                inner,
                name: config.name.clone(),
            })
        }
        .instrument(span)
        .await
    }
}

/// Instance half of [`TracedServerAdapter`]
pub struct TracedServerInstance<I> {
    inner: I,
    name: String,
}

impl<I> TracedServerInstance<I> {
    pub fn inner(&self) -> &I {
        &self.inner
    }
}

#[async_trait]
impl<I: ServerInstance> ServerInstance for TracedServerInstance<I> {
    async fn ready(&mut self) -> Result<(), ServerError> {
        let span = tracing::info_span!("server.ready", name = %self.name);
        let inner = &mut self.inner;

        async move {
            let start = Instant::now();
            let result = inner.ready().await;
            let elapsed = start.elapsed();

            match &result {
                Ok(()) => tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "ready"),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "not ready"
                ),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn close(&mut self) -> Result<(), ServerError> {
        let span = tracing::info_span!("server.close", name = %self.name);
        let inner = &mut self.inner;

        async move {
            let result = inner.close().await;
            // close() failing is often acceptable (process already gone)
            match &result {
                Ok(()) => tracing::info!("closed"),
                Err(e) => tracing::warn!(error = %e, "close failed (may be expected)"),
            }
            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
