use std::sync::atomic::{AtomicU64, Ordering};

/// Optional, atomics-backed counters for monitoring ring throughput.
///
/// Only touched when [`crate::RingConfig::enable_metrics`] is set; otherwise
/// the Ring skips these `fetch_add` calls entirely, so the feature costs
/// nothing when unused.
#[derive(Debug, Default)]
pub struct Metrics {
    messages_pushed: AtomicU64,
    messages_popped: AtomicU64,
    batches_pushed: AtomicU64,
    batches_popped: AtomicU64,
    futex_wakes: AtomicU64,
}

impl Metrics {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_messages_pushed(&self, n: u64) {
        self.messages_pushed.fetch_add(n, Ordering::Relaxed);
        self.batches_pushed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add_messages_popped(&self, n: u64) {
        self.messages_popped.fetch_add(n, Ordering::Relaxed);
        self.batches_popped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add_futex_wake(&self) {
        self.futex_wakes.fetch_add(1, Ordering::Relaxed);
    }

    /// Take an atomic snapshot of the current counters.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            messages_pushed: self.messages_pushed.load(Ordering::Relaxed),
            messages_popped: self.messages_popped.load(Ordering::Relaxed),
            batches_pushed: self.batches_pushed.load(Ordering::Relaxed),
            batches_popped: self.batches_popped.load(Ordering::Relaxed),
            futex_wakes: self.futex_wakes.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time copy of [`Metrics`]'s counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Total elements pushed.
    pub messages_pushed: u64,
    /// Total elements popped.
    pub messages_popped: u64,
    /// Total push batches (a single-element push counts as one batch).
    pub batches_pushed: u64,
    /// Total pop batches.
    pub batches_popped: u64,
    /// Total futex wake-all calls issued.
    pub futex_wakes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_additions() {
        let m = Metrics::new();
        m.add_messages_pushed(3);
        m.add_messages_popped(2);
        m.add_futex_wake();

        let snap = m.snapshot();
        assert_eq!(snap.messages_pushed, 3);
        assert_eq!(snap.messages_popped, 2);
        assert_eq!(snap.batches_pushed, 1);
        assert_eq!(snap.batches_popped, 1);
        assert_eq!(snap.futex_wakes, 1);
    }
}
