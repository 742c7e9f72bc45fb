//! Startup failure specs
//!
//! Failed and timed-out starts never hand out a descriptor and never leak
//! a running instance.

use crate::prelude::*;

#[tokio::test]
async fn readiness_timeout_leaks_nothing() {
    let scratch = Scratch::with(FakeBehavior::NeverReady);

    let err = scratch
        .manager
        .start_instance(&scratch.storage("a"))
        .await
        .err()
        .unwrap();

    assert!(matches!(err, FixtureError::ReadinessTimeout { .. }));
    assert!(err.to_string().contains("200ms"), "got: {}", err);
    assert!(scratch.fake().running().is_empty());
}

#[tokio::test]
async fn launch_failure_surfaces_verbatim() {
    let scratch = Scratch::with(FakeBehavior::FailLaunch("exec format error".to_string()));

    let err = scratch
        .manager
        .start_instance(&scratch.storage("a"))
        .await
        .err()
        .unwrap();

    assert!(matches!(err, FixtureError::Launch(_)));
    assert!(err.to_string().contains("exec format error"), "got: {}", err);
    assert!(!err.is_fatal());
}

#[tokio::test]
async fn exhausted_allocator_is_fatal() {
    let scratch = Scratch::ready();
    let manager = InstanceManager::new(FakeServerAdapter::new())
        .with_allocator(PortAllocator::starting_at(u16::MAX));

    let err = manager
        .start_instance(&scratch.storage("a"))
        .await
        .err()
        .unwrap();

    assert!(err.is_fatal());
    assert!(manager.adapter().calls().is_empty());
}
