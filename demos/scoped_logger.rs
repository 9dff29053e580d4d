//! Demonstrates the structured logging emitted at the ring's cold-path
//! lifecycle transitions (allocate, wait, notify, free). Nothing is logged
//! on the push/pop hot path; this only becomes visible at these transitions.
//!
//! Run with: `RUST_LOG=trace cargo run --release --example scoped_logger`

use spsc_ring::{BothWait, GlobalRingAllocator, Ring, RingConfig};
use std::thread;
use std::time::Duration;
use tracing::info_span;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let _guard = info_span!("demo_session").entered();

    let mut ring = Ring::<&'static str, BothWait>::new();
    ring.allocate(&GlobalRingAllocator, RingConfig::new(4, true))
        .expect("allocate should succeed");

    {
        let _span = info_span!("producer_burst").entered();
        ring.push_wait("hello");
        ring.push_wait("world");
    }

    {
        let _span = info_span!("consumer_drain").entered();
        thread::sleep(Duration::from_millis(10));
        while let Some(msg) = ring.try_pop() {
            tracing::info!(msg, "drained message");
        }
    }

    ring.end_pop_waiting();
    ring.reset_pop_waiting();

    println!("metrics: {:?}", ring.metrics());
    ring.free(&GlobalRingAllocator);
}
