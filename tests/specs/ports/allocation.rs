//! Port allocation specs
//!
//! Concurrent callers never receive the same port and exhaustion is
//! reported as a fatal error instead of an invalid port.

use crate::prelude::*;
use std::collections::HashSet;
use std::thread;

#[test]
fn concurrent_allocations_never_collide() {
    let allocator = PortAllocator::starting_at(47_000);

    let workers: Vec<_> = (0..8)
        .map(|_| {
            let allocator = allocator.clone();
            thread::spawn(move || {
                (0..16)
                    .map(|_| allocator.allocate().unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ports = HashSet::new();
    for worker in workers {
        for port in worker.join().unwrap() {
            assert!(ports.insert(port), "duplicate port {}", port);
        }
    }
    assert_eq!(ports.len(), 128);
}

#[test]
fn allocator_near_maximum_reports_exhaustion() {
    let allocator = PortAllocator::starting_at(u16::MAX - 1);

    let mut last = allocator.allocate();
    while let Ok(port) = last {
        assert!(port > u16::MAX - 1);
        last = allocator.allocate();
    }

    assert!(last.unwrap_err().is_fatal());
}
