//! Instance lifecycle specs
//!
//! Start, use the descriptor, tear down.

use crate::prelude::*;

#[tokio::test]
async fn started_instance_is_reachable_on_both_ports() {
    let scratch = Scratch::ready();

    let (_descriptor, mut handle) = scratch
        .manager
        .start_instance(&scratch.storage("a"))
        .await
        .unwrap();

    assert_ne!(handle.client_addr(), handle.peer_addr());
    assert!(!is_port_free(handle.client_addr().port()));
    assert!(!is_port_free(handle.peer_addr().port()));

    handle.stop().await.unwrap();
}

#[tokio::test]
async fn descriptor_targets_peer_address() {
    let scratch = Scratch::ready();

    let (descriptor, mut handle) = scratch
        .manager
        .start_instance(&scratch.storage("a"))
        .await
        .unwrap();

    assert_eq!(descriptor.host(), format!("http://{}", handle.peer_addr()));
    assert_eq!(descriptor.user(), "user");
    assert_eq!(descriptor.pass(), "pass");
    assert!(descriptor.insecure_skip_verify());

    handle.stop().await.unwrap();
}

#[tokio::test]
async fn teardown_frees_ports_and_cancels_ctx() {
    let scratch = Scratch::ready();

    let (descriptor, mut handle) = scratch
        .manager
        .start_instance(&scratch.storage("a"))
        .await
        .unwrap();
    let ports = [handle.client_addr().port(), handle.peer_addr().port()];

    handle.stop().await.unwrap();

    assert_eq!(handle.state(), InstanceState::Stopped);
    assert!(descriptor.ctx().is_cancelled());
    for port in ports {
        assert!(is_port_free(port), "port {} still bound", port);
    }
}

#[tokio::test]
async fn instances_do_not_share_ports_or_ctx() {
    let scratch = Scratch::ready();

    let (first_desc, mut first) = scratch
        .manager
        .start_instance(&scratch.storage("a"))
        .await
        .unwrap();
    let (second_desc, mut second) = scratch
        .manager
        .start_instance(&scratch.storage("b"))
        .await
        .unwrap();

    assert_ne!(first.client_addr(), second.client_addr());
    assert_ne!(first.peer_addr(), second.peer_addr());
    assert_ne!(first.client_addr(), second.peer_addr());

    first.stop().await.unwrap();
    assert!(first_desc.ctx().is_cancelled());
    assert!(!second_desc.ctx().is_cancelled());

    second.stop().await.unwrap();
}
