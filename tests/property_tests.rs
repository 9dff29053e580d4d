//! Property-based tests for the invariants documented in `SPEC_FULL.md` §8.
//!
//! These exercise `Ring<T, NoWait>` single-threaded, generating arbitrary
//! sequences of push/pop/batch operations and checking the invariants hold
//! after every step, rather than hand-picking scenarios.

use proptest::prelude::*;
use spsc_ring::{GlobalRingAllocator, NoWait, Ring, RingConfig};

#[derive(Debug, Clone)]
enum Op {
    TryPush(u32),
    TryPop,
    PushMany(Vec<u32>),
    PopMany(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<u32>().prop_map(Op::TryPush),
        Just(Op::TryPop),
        prop::collection::vec(any::<u32>(), 0..8).prop_map(Op::PushMany),
        (0usize..8).prop_map(Op::PopMany),
    ]
}

proptest! {
    /// INV: `0 <= size() <= capacity` after any sequence of operations.
    #[test]
    fn bounded_count_holds_under_arbitrary_ops(
        capacity in 1usize..64,
        ops in prop::collection::vec(op_strategy(), 0..200),
    ) {
        let mut ring = Ring::<u32, NoWait>::new();
        ring.allocate(&GlobalRingAllocator, RingConfig::new(capacity, false)).unwrap();

        for op in ops {
            match op {
                Op::TryPush(v) => { ring.try_push(v); }
                Op::TryPop => { ring.try_pop(); }
                Op::PushMany(items) => { ring.push_many(items); }
                Op::PopMany(n) => {
                    let mut out = Vec::with_capacity(n);
                    ring.pop_many(&mut out);
                }
            }
            prop_assert!(ring.size() <= capacity);
        }

        // Drain before dropping: `free` requires an empty ring.
        let mut out = Vec::with_capacity(ring.size());
        ring.pop_many(&mut out);
        ring.free(&GlobalRingAllocator);
    }

    /// INV: FIFO order is preserved across interleaved single and batch
    /// push/pop, including wrap-around.
    #[test]
    fn fifo_order_preserved_across_wraps(
        capacity in 1usize..16,
        batch_sizes in prop::collection::vec(1usize..10, 1..30),
    ) {
        let mut ring = Ring::<u64, NoWait>::new();
        ring.allocate(&GlobalRingAllocator, RingConfig::new(capacity, false)).unwrap();

        let mut next_push = 0u64;
        let mut next_expected_pop = 0u64;

        for batch in batch_sizes {
            let items: Vec<u64> = (next_push..next_push + batch as u64).collect();
            let remainder = ring.push_many(items);
            let pushed = batch - remainder.len();
            next_push += pushed as u64;

            let mut out = Vec::with_capacity(ring.size());
            ring.pop_many(&mut out);
            for v in out {
                prop_assert_eq!(v, next_expected_pop);
                next_expected_pop += 1;
            }
        }

        prop_assert!(ring.is_empty());
        ring.free(&GlobalRingAllocator);
    }

    /// INV-RES: a batch push that doesn't fully fit returns exactly the
    /// unconsumed suffix, and the consumed prefix is exactly what made it in.
    #[test]
    fn partial_batch_push_returns_exact_remainder(
        capacity in 1usize..20,
        items in prop::collection::vec(any::<u16>(), 0..40),
    ) {
        let mut ring = Ring::<u16, NoWait>::new();
        ring.allocate(&GlobalRingAllocator, RingConfig::new(capacity, false)).unwrap();

        let total = items.len();
        let remainder = ring.push_many(items.clone());
        let consumed = total - remainder.len();

        prop_assert!(consumed <= capacity);
        prop_assert_eq!(ring.size(), consumed);
        if !remainder.is_empty() {
            prop_assert_eq!(&remainder[..], &items[consumed..]);
        }

        let mut out = Vec::with_capacity(consumed);
        ring.pop_many(&mut out);
        prop_assert_eq!(&out[..], &items[..consumed]);
        ring.free(&GlobalRingAllocator);
    }
}

#[test]
fn scenario_try_pop_drains_then_reports_empty() {
    let mut ring = Ring::<u32, NoWait>::new();
    ring.allocate(&GlobalRingAllocator, RingConfig::new(4, false))
        .unwrap();
    assert!(ring.try_push(42));
    assert_eq!(ring.try_pop(), Some(42));
    assert_eq!(ring.try_pop(), None);
    ring.free(&GlobalRingAllocator);
}

#[test]
fn scenario_full_ring_rejects_additional_push() {
    let mut ring = Ring::<u32, NoWait>::new();
    ring.allocate(&GlobalRingAllocator, RingConfig::new(3, false))
        .unwrap();
    for i in 0..3 {
        assert!(ring.try_push(i));
    }
    assert!(!ring.try_push(99));

    let mut out = Vec::with_capacity(3);
    ring.pop_many(&mut out);
    ring.free(&GlobalRingAllocator);
}

#[test]
fn scenario_push_many_returns_unconsumed_suffix() {
    let mut ring = Ring::<u32, NoWait>::new();
    ring.allocate(&GlobalRingAllocator, RingConfig::new(3, false))
        .unwrap();
    let remainder = ring.push_many(vec![1, 2, 3, 4, 5]);
    assert_eq!(remainder, vec![4, 5]);

    let mut out = Vec::with_capacity(3);
    ring.pop_many(&mut out);
    assert_eq!(out, vec![1, 2, 3]);
    ring.free(&GlobalRingAllocator);
}
