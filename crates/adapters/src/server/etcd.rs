// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! etcd process adapter

use super::{ServerAdapter, ServerError, ServerInstance};
use async_trait::async_trait;
use ef_core::StartupConfig;
use serde::Deserialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStderr, Command};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Log message etcd emits once it accepts client traffic
const READY_MESSAGE: &str = "ready to serve client requests";

/// Launches etcd as a child process
#[derive(Clone, Debug)]
pub struct EtcdAdapter {
    binary: PathBuf,
}

impl Default for EtcdAdapter {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("etcd"),
        }
    }
}

impl EtcdAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific etcd binary instead of the one on `PATH`
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

#[async_trait]
impl ServerAdapter for EtcdAdapter {
    type Instance = EtcdInstance;

    async fn start(&self, config: &StartupConfig) -> Result<EtcdInstance, ServerError> {
        let mut child = Command::new(&self.binary)
            .args(etcd_args(config))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ServerError::SpawnFailed(format!("{}: {}", self.binary.display(), e)))?;

        let Some(stderr) = child.stderr.take() else {
            // Child is killed on drop
            return Err(ServerError::SpawnFailed("stderr not captured".to_string()));
        };

        let (tx, rx) = watch::channel(Readiness::Starting);
        let log_task = tokio::spawn(watch_log(stderr, config.name.clone(), tx));

        Ok(EtcdInstance {
            child: Some(child),
            readiness: rx,
            log_task: Some(log_task),
        })
    }
}

/// Command-line flags for one single-member etcd cluster
pub(crate) fn etcd_args(config: &StartupConfig) -> Vec<OsString> {
    let client_url = config.client_url();
    let peer_url = config.peer_url();

    vec![
        "--name".into(),
        config.name.clone().into(),
        "--data-dir".into(),
        config.data_dir.clone().into_os_string(),
        "--listen-client-urls".into(),
        client_url.clone().into(),
        "--advertise-client-urls".into(),
        client_url.into(),
        "--listen-peer-urls".into(),
        peer_url.clone().into(),
        "--initial-advertise-peer-urls".into(),
        peer_url.clone().into(),
        "--initial-cluster".into(),
        format!("{}={}", config.name, peer_url).into(),
        "--max-txn-ops".into(),
        config.max_txn_ops.to_string().into(),
        "--max-request-bytes".into(),
        config.max_request_bytes.to_string().into(),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Readiness {
    Starting,
    Ready,
    Exited,
}

/// A running etcd child process
#[derive(Debug)]
pub struct EtcdInstance {
    child: Option<Child>,
    readiness: watch::Receiver<Readiness>,
    log_task: Option<JoinHandle<()>>,
}

impl EtcdInstance {
    /// OS process id, while the child is running
    pub fn pid(&self) -> Option<u32> {
        self.child.as_ref().and_then(|c| c.id())
    }
}

#[async_trait]
impl ServerInstance for EtcdInstance {
    async fn ready(&mut self) -> Result<(), ServerError> {
        let state = *self
            .readiness
            .wait_for(|s| *s != Readiness::Starting)
            .await
            .map_err(|_| ServerError::ExitedBeforeReady)?;

        match state {
            Readiness::Ready => Ok(()),
            Readiness::Starting | Readiness::Exited => Err(ServerError::ExitedBeforeReady),
        }
    }

    async fn close(&mut self) -> Result<(), ServerError> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        let exited = child
            .try_wait()
            .map_err(|e| ServerError::CommandFailed(e.to_string()))?
            .is_some();
        if !exited {
            child
                .kill()
                .await
                .map_err(|e| ServerError::CommandFailed(e.to_string()))?;
        }

        // stderr hits EOF once the process is gone
        if let Some(task) = self.log_task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "etcd log reader did not finish cleanly");
            }
        }

        Ok(())
    }
}

/// One line of etcd output. Structured (zap JSON) or plain text.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct LogRecord {
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub msg: String,
}

impl LogRecord {
    pub(crate) fn parse(line: &str) -> Self {
        serde_json::from_str(line).unwrap_or_else(|_| LogRecord {
            level: String::new(),
            msg: line.to_string(),
        })
    }

    pub(crate) fn is_ready(&self) -> bool {
        self.msg.contains(READY_MESSAGE)
    }

    fn emit(&self, member: &str) {
        match self.level.as_str() {
            "warn" => tracing::warn!(member, msg = %self.msg, "etcd"),
            "error" | "dpanic" | "panic" | "fatal" => {
                tracing::error!(member, msg = %self.msg, "etcd")
            }
            _ => tracing::debug!(member, msg = %self.msg, "etcd"),
        }
    }
}

/// Forward etcd's stderr to tracing and publish readiness
async fn watch_log(stderr: ChildStderr, member: String, tx: watch::Sender<Readiness>) {
    let mut reader = BufReader::new(stderr);
    let mut buf = Vec::new();

    // Keep draining until EOF: a closed pipe would kill etcd on its next write
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(member = %member, error = %e, "etcd stderr read failed");
                break;
            }
        }

        let line = String::from_utf8_lossy(&buf);
        let record = LogRecord::parse(line.trim_end_matches(['\r', '\n']));
        record.emit(&member);
        if record.is_ready() {
            tx.send_if_modified(|s| mark(s, Readiness::Ready));
        }
    }

    tx.send_if_modified(|s| mark(s, Readiness::Exited));
}

/// Move out of `Starting`; later states are final
fn mark(state: &mut Readiness, next: Readiness) -> bool {
    if *state == Readiness::Starting {
        *state = next;
        true
    } else {
        false
    }
}

#[cfg(test)]
#[path = "etcd_tests.rs"]
mod tests;
