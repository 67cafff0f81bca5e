//! Process-wide default queue capacity
//!
//! Kept in its own test binary: changing the default affects every queue that
//! follows it, so nothing else may run alongside.

use rust_log_dispatch::core::LogQueue;
use rust_log_dispatch::prelude::*;
use rust_log_dispatch::{default_capacity, set_default_capacity, USE_DEFAULT_CAPACITY};
use std::sync::Arc;
use std::time::Duration;

#[test]
fn test_default_capacity_setter() {
    assert_eq!(default_capacity(), 1024);

    // Clamped into the allowed range
    set_default_capacity(4);
    assert_eq!(default_capacity(), MIN_BUCKET_CAPACITY);
    set_default_capacity(1_000_000);
    assert_eq!(default_capacity(), MAX_BUCKET_CAPACITY);

    // Queues following the default see changes on their next push
    set_default_capacity(16);
    let queue = LogQueue::new(USE_DEFAULT_CAPACITY);
    for i in 0..40u32 {
        queue.push(i);
    }
    assert_eq!(queue.count(), 16);
    assert_eq!(queue.evicted_count(), 24);

    set_default_capacity(8);
    assert_eq!(queue.capacity(), 8);
    assert_eq!(queue.count(), 16);
    queue.push(40);
    assert_eq!(queue.count(), 8);
    let drained: Vec<u32> = std::iter::from_fn(|| queue.pop()).collect();
    assert_eq!(drained, (33..=40).collect::<Vec<_>>());

    // A pinned queue ignores the default
    let pinned: LogQueue<u32> = LogQueue::new(32);
    set_default_capacity(64);
    assert_eq!(pinned.capacity(), 32);

    // Handlers that do not ask for a length follow the default too
    let manager = LogManager::new();
    let handler = Arc::new(MemoryHandler::new("default-sized", LogFormat::Text));
    manager.register_handler(handler.clone()).unwrap();
    assert_eq!(manager.handler_stats("default-sized").unwrap().capacity, 64);

    manager.info("sized", None);
    assert!(handler.wait_for(1, Duration::from_secs(5)));

    set_default_capacity(1024);
}
