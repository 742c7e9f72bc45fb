// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ef-core: shared types for ephemeral etcd fixtures
//!
//! This crate provides:
//! - Free port allocation over a monotonic cursor
//! - Startup and fixture configuration
//! - The connection descriptor returned for a running instance

pub mod config;
pub mod descriptor;
pub mod ports;

pub use config::{
    FixtureConfig, StartupConfig, DEFAULT_READY_TIMEOUT, MAX_REQUEST_BYTES, MAX_TXN_OPS,
};
pub use descriptor::{ConnectionDescriptor, FIXTURE_PASS, FIXTURE_USER};
pub use ports::{
    is_port_free, AtomicPortCursor, PortAllocator, PortCursor, PortError, DEFAULT_BASE_PORT,
};
