use thiserror::Error;

/// Errors surfaced from the allocator path of [`crate::Ring::allocate`].
///
/// These are the only non-fatal failures in the crate: every other
/// precondition violation (double allocate, free while non-empty, ...) is a
/// programmer error and panics instead of returning a `Result`.
#[derive(Debug, Error)]
pub enum RingError {
    /// `capacity` is too large for the 32-bit index protocol: `⌊i32::MAX /
    /// capacity⌋` must be at least 2 so the index space wraps at least twice.
    #[error("capacity {capacity} is too large: i32::MAX / capacity must be >= 2")]
    CapacityTooLarge {
        /// The capacity that was requested.
        capacity: usize,
    },
    /// `capacity` must be at least 1.
    #[error("capacity must be at least 1")]
    ZeroCapacity,
    /// The allocator returned no buffer for the requested layout.
    #[error("allocator returned out-of-memory for {size} bytes (align {align})")]
    AllocatorOom {
        /// Requested size in bytes.
        size: usize,
        /// Requested alignment in bytes.
        align: usize,
    },
}
