/// Configuration for [`crate::Ring::allocate`].
///
/// Unlike the teacher's power-of-two `ring_bits` scheme, capacity here is an
/// arbitrary positive integer: the index protocol (SPEC_FULL.md §3/§4.2)
/// generalises past powers of two, so there is no `ring_bits`/mask field.
#[derive(Debug, Clone, Copy)]
pub struct RingConfig {
    /// Number of slots the ring will hold once allocated.
    pub capacity: usize,
    /// Enable the atomics-backed [`crate::Metrics`] counters (slight overhead
    /// on the hot path: one extra `fetch_add` per push/pop batch).
    pub enable_metrics: bool,
}

impl RingConfig {
    /// Creates a new configuration.
    #[must_use]
    pub const fn new(capacity: usize, enable_metrics: bool) -> Self {
        Self {
            capacity,
            enable_metrics,
        }
    }

    /// A small ring sized for latency-sensitive pipelines (256 slots).
    #[must_use]
    pub const fn low_latency() -> Self {
        Self::new(256, false)
    }

    /// A large ring sized to absorb bursty producers (64K slots).
    #[must_use]
    pub const fn high_throughput() -> Self {
        Self::new(64 * 1024, false)
    }
}

impl Default for RingConfig {
    fn default() -> Self {
        Self::new(1024, false)
    }
}
