//! A bounded, lock-free, wait-capable single-producer single-consumer ring
//! buffer.
//!
//! `Ring<T, W>` hands a fixed-capacity slot array to exactly one producer
//! thread and one consumer thread. The producer and consumer never contend
//! for the same cache line on the hot path: each owns its own index, and the
//! two meet only through the release/acquire pairing documented in
//! [`ring`]'s module header.
//!
//! Storage is not tied to the global allocator: callers supply a
//! [`RingAllocator`], so arenas, bump allocators, or NUMA-aware allocators
//! can back a `Ring` without the ring knowing anything about them.
//!
//! Blocking behaviour is selected at the type level via the `W` parameter
//! ([`NoWait`], [`PushWait`], [`PopWait`], [`BothWait`]): a `Ring<T, NoWait>`
//! simply doesn't have a `pop_wait` method to call, so misuse is a compile
//! error rather than a runtime surprise.
//!
//! ```
//! use spsc_ring::{GlobalRingAllocator, NoWait, Ring, RingConfig};
//!
//! let mut ring = Ring::<u64, NoWait>::new();
//! ring.allocate(&GlobalRingAllocator, RingConfig::new(16, false)).unwrap();
//!
//! assert!(ring.try_push(42));
//! assert_eq!(ring.try_pop(), Some(42));
//!
//! ring.free(&GlobalRingAllocator);
//! ```

mod alloc;
mod config;
mod error;
mod invariants;
mod metrics;
mod policy;
mod ring;
mod wait;

pub use alloc::{GlobalRingAllocator, RingAllocator};
pub use config::RingConfig;
pub use error::RingError;
pub use metrics::{Metrics, MetricsSnapshot};
pub use policy::{BothWait, NoWait, PopWait, PopWaitable, PushWait, PushWaitable, WaitPolicy};
pub use ring::Ring;
