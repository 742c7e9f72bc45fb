//! Live etcd specs
//!
//! Skipped unless an `etcd` binary is available.

use crate::prelude::*;
use ef_fixture::EtcdFixture;
use std::net::TcpStream;

#[tokio::test]
async fn etcd_starts_serves_and_stops() {
    if !etcd_available() {
        eprintln!("etcd not found on PATH, skipping");
        return;
    }

    let scratch = Scratch::ready();
    let fixture = EtcdFixture::etcd();

    let (descriptor, mut handle) = fixture
        .start_instance(&scratch.storage("etcd"))
        .await
        .unwrap();

    assert_eq!(descriptor.host(), format!("http://{}", handle.peer_addr()));
    assert!(TcpStream::connect(handle.client_addr()).is_ok());
    assert!(TcpStream::connect(handle.peer_addr()).is_ok());

    let ports = [handle.client_addr().port(), handle.peer_addr().port()];
    handle.stop().await.unwrap();

    assert!(descriptor.ctx().is_cancelled());
    for port in ports {
        assert!(is_port_free(port), "port {} still bound", port);
    }
}

#[tokio::test]
async fn etcd_missing_binary_is_launch_failure() {
    let scratch = Scratch::ready();
    let fixture = InstanceManager::new(ef_adapters::TracedServerAdapter::new(
        ef_adapters::EtcdAdapter::new().with_binary(scratch.storage("no-such-etcd")),
    ));

    let err = fixture
        .start_instance(&scratch.storage("etcd"))
        .await
        .err()
        .unwrap();

    assert!(matches!(err, FixtureError::Launch(_)));
}
