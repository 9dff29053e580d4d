//! Debug assertion macros for ring buffer invariants.
//!
//! These macros provide runtime checks for the invariants documented in
//! `SPEC_FULL.md` section 3. They are only active in debug builds
//! (`#[cfg(debug_assertions)]`), so there is zero overhead in release builds.

/// Assert that count does not exceed capacity.
///
/// **Invariant**: `0 ≤ (pushIndex - popIndex) ≤ capacity` (in the disambiguated
/// sense of SPEC_FULL.md §3 invariant 2).
macro_rules! debug_assert_bounded_count {
    ($count:expr, $capacity:expr) => {
        debug_assert!(
            $count <= $capacity,
            "bounded-count invariant violated: count {} exceeds capacity {}",
            $count,
            $capacity
        )
    };
}

/// Assert that an index stays within `[0, index_end)`.
macro_rules! debug_assert_index_in_range {
    ($name:literal, $index:expr, $index_end:expr) => {
        debug_assert!(
            $index >= 0 && $index < $index_end,
            "index invariant violated: {} = {} outside [0, {})",
            $name,
            $index,
            $index_end
        )
    };
}

/// Assert that we're reading from a slot known to be initialised.
///
/// **Invariant**: slot at `pos` is live iff `pos` lies in `[pop_index, push_index)`
/// modulo `index_end`.
macro_rules! debug_assert_initialized_read {
    ($pos:expr, $pop_index:expr, $push_index:expr) => {
        debug_assert!(
            $pos != $push_index,
            "initialized-read invariant violated: reading slot at seq {} at or past push_index {}",
            $pos,
            $push_index
        )
    };
}

/// Assert that the low-31-bit count never exceeds capacity after a mutation.
macro_rules! debug_assert_size_bounded {
    ($count:expr, $capacity:expr) => {
        debug_assert!(
            $count <= $capacity as u32,
            "size invariant violated: low-31-bit count {} exceeds capacity {}",
            $count,
            $capacity
        )
    };
}

pub(crate) use debug_assert_bounded_count;
pub(crate) use debug_assert_index_in_range;
pub(crate) use debug_assert_initialized_read;
pub(crate) use debug_assert_size_bounded;
