//! Shared helpers for specs

#![allow(dead_code)]

pub use ef_adapters::{FakeBehavior, FakeServerAdapter};
pub use ef_core::{is_port_free, PortAllocator};
pub use ef_fixture::{FixtureConfig, FixtureError, InstanceManager, InstanceState};
pub use std::time::Duration;

use tempfile::TempDir;

/// Scratch storage root plus a manager over the fake server
pub struct Scratch {
    pub dir: TempDir,
    pub manager: InstanceManager<FakeServerAdapter>,
}

impl Scratch {
    /// Instances become ready immediately
    pub fn ready() -> Self {
        Self::with(FakeBehavior::Ready)
    }

    pub fn with(behavior: FakeBehavior) -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let manager = InstanceManager::new(FakeServerAdapter::with_behavior(behavior))
            .with_config(FixtureConfig::new().with_ready_timeout(Duration::from_millis(200)));
        Self { dir, manager }
    }

    pub fn fake(&self) -> &FakeServerAdapter {
        self.manager.adapter()
    }

    /// Storage directory for one instance
    pub fn storage(&self, name: &str) -> std::path::PathBuf {
        self.dir.path().join(name)
    }
}

/// Whether an `etcd` binary can be executed
pub fn etcd_available() -> bool {
    std::process::Command::new("etcd")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}
