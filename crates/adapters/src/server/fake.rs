// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake server adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ServerAdapter, ServerError, ServerInstance};
use async_trait::async_trait;
use ef_core::StartupConfig;
use std::collections::HashSet;
use std::net::TcpListener;
use std::sync::{Arc, Mutex};

/// Recorded server call
#[derive(Debug, Clone)]
pub enum ServerCall {
    Start { config: StartupConfig },
    Ready { name: String },
    Close { name: String },
}

/// How fake instances behave
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FakeBehavior {
    /// Report ready immediately
    #[default]
    Ready,
    /// Never report ready
    NeverReady,
    /// Fail the launch itself
    FailLaunch(String),
    /// Launch, then exit before reporting ready
    ExitBeforeReady,
    /// Report ready, then fail on close
    FailClose(String),
}

/// Fake server adapter for testing.
///
/// Running instances hold real listeners on their client and peer ports,
/// so tests can check that closing an instance releases them.
#[derive(Clone, Default)]
pub struct FakeServerAdapter {
    behavior: Arc<Mutex<FakeBehavior>>,
    calls: Arc<Mutex<Vec<ServerCall>>>,
    running: Arc<Mutex<HashSet<String>>>,
}

impl FakeServerAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_behavior(behavior: FakeBehavior) -> Self {
        let adapter = Self::default();
        adapter.set_behavior(behavior);
        adapter
    }

    /// Change behavior for instances started from now on
    pub fn set_behavior(&self, behavior: FakeBehavior) {
        *self.behavior.lock().unwrap_or_else(|e| e.into_inner()) = behavior;
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<ServerCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of close calls recorded for an instance
    pub fn close_count(&self, name: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, ServerCall::Close { name: n } if n == name))
            .count()
    }

    /// Names of instances started and not yet closed
    pub fn running(&self) -> Vec<String> {
        let mut names: Vec<_> = self
            .running
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .cloned()
            .collect();
        names.sort();
        names
    }

    fn record(&self, call: ServerCall) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }
}

#[async_trait]
impl ServerAdapter for FakeServerAdapter {
    type Instance = FakeServerInstance;

    async fn start(&self, config: &StartupConfig) -> Result<FakeServerInstance, ServerError> {
        self.record(ServerCall::Start {
            config: config.clone(),
        });

        let behavior = self
            .behavior
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();

        if let FakeBehavior::FailLaunch(message) = &behavior {
            return Err(ServerError::SpawnFailed(message.clone()));
        }

        let client = TcpListener::bind(config.client_addr)
            .map_err(|e| ServerError::SpawnFailed(format!("{}: {}", config.client_addr, e)))?;
        let peer = TcpListener::bind(config.peer_addr)
            .map_err(|e| ServerError::SpawnFailed(format!("{}: {}", config.peer_addr, e)))?;

        self.running
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(config.name.clone());

        Ok(FakeServerInstance {
            name: config.name.clone(),
            behavior,
            listeners: Some((client, peer)),
            adapter: self.clone(),
        })
    }
}

/// Fake running instance
pub struct FakeServerInstance {
    name: String,
    behavior: FakeBehavior,
    listeners: Option<(TcpListener, TcpListener)>,
    adapter: FakeServerAdapter,
}

impl FakeServerInstance {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_open(&self) -> bool {
        self.listeners.is_some()
    }
}

#[async_trait]
impl ServerInstance for FakeServerInstance {
    async fn ready(&mut self) -> Result<(), ServerError> {
        self.adapter.record(ServerCall::Ready {
            name: self.name.clone(),
        });

        match self.behavior {
            FakeBehavior::NeverReady => std::future::pending().await,
            FakeBehavior::ExitBeforeReady => Err(ServerError::ExitedBeforeReady),
            FakeBehavior::Ready | FakeBehavior::FailLaunch(_) | FakeBehavior::FailClose(_) => {
                Ok(())
            }
        }
    }

    async fn close(&mut self) -> Result<(), ServerError> {
        self.adapter.record(ServerCall::Close {
            name: self.name.clone(),
        });

        self.listeners = None;
        self.adapter
            .running
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.name);

        match &self.behavior {
            FakeBehavior::FailClose(message) => Err(ServerError::CommandFailed(message.clone())),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
