// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn peer_descriptor_fields() {
    let addr: SocketAddr = "127.0.0.1:2381".parse().unwrap();
    let descriptor = ConnectionDescriptor::for_peer(CancellationToken::new(), addr);

    assert_eq!(descriptor.host(), "http://127.0.0.1:2381");
    assert_eq!(descriptor.user(), "user");
    assert_eq!(descriptor.pass(), "pass");
    assert!(descriptor.insecure_skip_verify());
    assert!(!descriptor.ctx().is_cancelled());
}

#[test]
fn descriptor_ctx_follows_parent_token() {
    let token = CancellationToken::new();
    let addr: SocketAddr = "127.0.0.1:2381".parse().unwrap();
    let descriptor = ConnectionDescriptor::for_peer(token.clone(), addr);

    token.cancel();
    assert!(descriptor.ctx().is_cancelled());
}
