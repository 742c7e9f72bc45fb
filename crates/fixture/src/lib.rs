// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ef-fixture: ephemeral etcd instances for tests
//!
//! [`InstanceManager::start_instance`] allocates a client and a peer port,
//! launches one instance, waits for it to report ready and returns a
//! [`ConnectionDescriptor`] together with an [`InstanceHandle`] that tears
//! the instance down.

mod error;
mod handle;
mod manager;

pub use error::FixtureError;
pub use handle::{InstanceHandle, InstanceState};
pub use manager::{start_etcd, EtcdFixture, EtcdHandle, InstanceManager};

pub use ef_core::{ConnectionDescriptor, FixtureConfig, PortAllocator};
