//! Demonstrates the producer/consumer throughput a `Ring` sustains once
//! `push_index`, `pop_index`, and `size` are each isolated to their own
//! cache line via `crossbeam_utils::CachePadded`.
//!
//! Run with: `cargo run --release --example false_sharing`

use spsc_ring::{BothWait, GlobalRingAllocator, Ring, RingConfig};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

fn main() {
    println!("spsc-ring false-sharing demo");
    println!("============================\n");

    const ITEMS: u64 = 5_000_000;
    const CAPACITY: usize = 4096;

    let mut ring = Ring::<u64, BothWait>::new();
    ring.allocate(&GlobalRingAllocator, RingConfig::new(CAPACITY, false))
        .expect("allocate should succeed");
    let ring = Arc::new(ring);

    println!("Configuration:");
    println!("  Capacity: {CAPACITY}");
    println!("  Items:    {ITEMS}\n");

    let start = Instant::now();

    let producer_ring = Arc::clone(&ring);
    let producer = thread::spawn(move || {
        for i in 0..ITEMS {
            producer_ring.push_wait(i);
        }
        producer_ring.end_pop_waiting();
    });

    let consumer_ring = Arc::clone(&ring);
    let consumer = thread::spawn(move || {
        let mut sum = 0u64;
        let mut count = 0u64;
        while let Some(v) = consumer_ring.pop_wait() {
            sum = sum.wrapping_add(v);
            count += 1;
        }
        (count, sum)
    });

    producer.join().expect("producer panicked");
    let (count, sum) = consumer.join().expect("consumer panicked");
    let elapsed = start.elapsed();

    println!("Transferred {count} items (checksum {sum}) in {elapsed:?}");
    println!(
        "Throughput: {:.2} million items/sec",
        count as f64 / elapsed.as_secs_f64() / 1_000_000.0
    );

    let ring = Arc::try_unwrap(ring).unwrap_or_else(|_| panic!("ring still shared"));
    let mut ring = ring;
    ring.free(&GlobalRingAllocator);
}
