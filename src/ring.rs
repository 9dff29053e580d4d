use crate::alloc::RingAllocator;
use crate::config::RingConfig;
use crate::error::RingError;
use crate::invariants::{
    debug_assert_bounded_count, debug_assert_index_in_range, debug_assert_initialized_read,
    debug_assert_size_bounded,
};
use crate::metrics::{Metrics, MetricsSnapshot};
use crate::policy::{PopWaitable, PushWaitable, WaitPolicy};
use crate::wait;

use crossbeam_utils::CachePadded;
use std::alloc::Layout;
use std::marker::PhantomData;
use std::mem::{self, MaybeUninit};
use std::ptr::{self, NonNull};
use std::sync::atomic::{AtomicI32, AtomicU32, Ordering};

const TERMINAL_BIT: u32 = 1 << 31;
const COUNT_MASK: u32 = !TERMINAL_BIT;

fn cache_line_align<T>() -> usize {
    mem::align_of::<T>().max(64)
}

// =============================================================================
// MEMORY ORDERING & SYNCHRONIZATION STRATEGY
// =============================================================================
//
// Classic SPSC producer-consumer protocol over bounded 32-bit indices.
//
// Producer (try_push / push_many):
// 1. Load push_index Relaxed (producer is its sole writer)
// 2. Load pop_index Acquire (synchronizes with consumer's Release store, so
//    the consumer's move-out of the previous occupant happens-before reuse)
// 3. Write the element(s) in place
// 4. Store push_index Release (publishes the write to the consumer)
// 5. Update `size` with the ordering W::push_size_ordering() picks
//
// Consumer (try_pop / pop_many):
// 1. Load push_index Acquire (synchronizes with producer's Release store)
// 2. Load pop_index Relaxed (consumer is its sole writer)
// 3. Move the element(s) out
// 4. Store pop_index Release (publishes the consumption to the producer)
// 5. Update `size` with the ordering W::pop_size_ordering() picks
//
// =============================================================================

/// A bounded, lock-free, wait-capable single-producer single-consumer ring
/// buffer.
///
/// `W` selects the compile-time wait policy: [`crate::NoWait`] (default),
/// [`crate::PushWait`], [`crate::PopWait`], or [`crate::BothWait`]. Operations
/// not permitted by `W` are simply absent from `Ring<T, W>`'s method set.
///
/// A `Ring` starts **unallocated**: it holds no storage until [`Ring::allocate`]
/// is called, and must be returned to that state via [`Ring::free`] before it
/// is dropped.
pub struct Ring<T, W = crate::NoWait> {
    // === PRODUCER HOT ===
    push_index: CachePadded<AtomicI32>,
    // === CONSUMER HOT ===
    pop_index: CachePadded<AtomicI32>,
    // === SHARED / WAIT RENDEZVOUS ===
    size: CachePadded<AtomicU32>,

    // === COLD STATE === (owner-only, set at allocate/free time)
    capacity: usize,
    index_end: i32,
    storage: *mut MaybeUninit<T>,
    enable_metrics: bool,
    metrics: Metrics,

    _wait: PhantomData<W>,
}

// SAFETY: Ring is Send + Sync as long as T is Send; the index protocol
// ensures exclusive slot ownership crosses threads only via the
// release/acquire pairing documented above.
unsafe impl<T: Send, W> Send for Ring<T, W> {}
unsafe impl<T: Send, W> Sync for Ring<T, W> {}

impl<T, W: WaitPolicy> Ring<T, W> {
    /// Creates a new, unallocated ring. Call [`Ring::allocate`] before use.
    #[must_use]
    pub fn new() -> Self {
        Self {
            push_index: CachePadded::new(AtomicI32::new(0)),
            pop_index: CachePadded::new(AtomicI32::new(0)),
            size: CachePadded::new(AtomicU32::new(0)),
            capacity: 0,
            index_end: 0,
            storage: ptr::null_mut(),
            enable_metrics: false,
            metrics: Metrics::new(),
            _wait: PhantomData,
        }
    }

    // ---------------------------------------------------------------------
    // STORAGE LIFECYCLE
    // ---------------------------------------------------------------------

    /// Returns true once `allocate` has succeeded and before the matching `free`.
    #[inline]
    #[must_use]
    pub fn is_allocated(&self) -> bool {
        !self.storage.is_null()
    }

    /// Returns the ring's capacity, or 0 if unallocated.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn storage_layout(&self) -> Layout {
        let align = cache_line_align::<T>();
        let size_bytes = self.capacity * mem::size_of::<T>();
        Layout::from_size_align(size_bytes, align)
            .expect("layout computed at allocate time must remain valid")
    }

    /// Allocates storage for `config.capacity` elements via `alloc`.
    ///
    /// # Panics
    ///
    /// Panics if the ring is already allocated (double-allocate is a
    /// programmer error, not a recoverable failure).
    pub fn allocate(
        &mut self,
        alloc: &impl RingAllocator,
        config: RingConfig,
    ) -> Result<(), RingError> {
        assert!(
            !self.is_allocated(),
            "Ring::allocate called on an already-allocated ring"
        );

        let capacity = config.capacity;
        if capacity == 0 {
            return Err(RingError::ZeroCapacity);
        }

        // INV: K = floor(i32::MAX / capacity) must be >= 2 so the index
        // space wraps at least twice (SPEC_FULL.md section 3).
        let k = (i32::MAX as usize) / capacity;
        if k < 2 {
            return Err(RingError::CapacityTooLarge { capacity });
        }

        let align = cache_line_align::<T>();
        let size_bytes = capacity
            .checked_mul(mem::size_of::<T>())
            .ok_or(RingError::CapacityTooLarge { capacity })?;
        let layout = if size_bytes == 0 {
            Layout::from_size_align(0, align).expect("zero-sized layout is always valid")
        } else {
            Layout::from_size_align(size_bytes, align)
                .map_err(|_| RingError::CapacityTooLarge { capacity })?
        };

        let buffer = alloc.allocate(layout).ok_or(RingError::AllocatorOom {
            size: layout.size(),
            align: layout.align(),
        })?;

        self.storage = buffer.as_ptr().cast::<MaybeUninit<T>>();
        self.capacity = capacity;
        self.index_end = (capacity * k) as i32;
        self.push_index.store(0, Ordering::Relaxed);
        self.pop_index.store(0, Ordering::Relaxed);
        self.size.store(0, Ordering::Relaxed);
        self.enable_metrics = config.enable_metrics;

        tracing::debug!(capacity, index_end = self.index_end, "ring allocated");
        Ok(())
    }

    /// Returns storage to `alloc`.
    ///
    /// # Panics
    ///
    /// Panics if the ring is unallocated, or if it is non-empty (freeing a
    /// non-empty ring would leak or double-drop live elements; this is a
    /// programmer error, not a recoverable failure).
    pub fn free(&mut self, alloc: &impl RingAllocator) {
        assert!(
            self.is_allocated(),
            "Ring::free called on an unallocated ring"
        );
        assert!(
            self.is_empty(),
            "Ring::free called on a non-empty ring (size = {})",
            self.size()
        );

        let layout = self.storage_layout();
        let ptr = NonNull::new(self.storage.cast::<u8>())
            .expect("allocated storage pointer is never null");
        // SAFETY: ptr/layout match the `allocate` call that produced them,
        // and the ring is empty so no live elements are discarded.
        unsafe { alloc.deallocate(ptr, layout) };

        self.storage = ptr::null_mut();
        self.capacity = 0;
        self.index_end = 0;
        tracing::debug!("ring freed");
    }

    // ---------------------------------------------------------------------
    // OBSERVATION
    // ---------------------------------------------------------------------

    /// Current element count (masks off the terminal shutdown bit).
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        (self.size.load(Ordering::Relaxed) & COUNT_MASK) as usize
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.size() == self.capacity
    }

    /// A snapshot of the optional metrics counters (zeroed if metrics are disabled).
    #[must_use]
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    // ---------------------------------------------------------------------
    // SIZE COUNTER PROTOCOL (SPEC_FULL.md section 4.5)
    // ---------------------------------------------------------------------

    fn increment_size_and_maybe_notify(&self, n: u32) {
        let prev = self.size.fetch_add(n, W::push_size_ordering());
        debug_assert_size_bounded!((prev & COUNT_MASK) + n, self.capacity);
        if self.enable_metrics {
            self.metrics.add_messages_pushed(u64::from(n));
        }
        if W::POP_WAITABLE && (prev & COUNT_MASK) == 0 {
            wait::wake_all(&self.size);
            if self.enable_metrics {
                self.metrics.add_futex_wake();
            }
        }
    }

    fn decrement_size_and_maybe_notify(&self, n: u32) {
        let prev = self.size.fetch_sub(n, W::pop_size_ordering());
        if self.enable_metrics {
            self.metrics.add_messages_popped(u64::from(n));
        }
        if W::PUSH_WAITABLE && (prev & COUNT_MASK) == self.capacity as u32 {
            wait::wake_all(&self.size);
            if self.enable_metrics {
                self.metrics.add_futex_wake();
            }
        }
    }

    // ---------------------------------------------------------------------
    // SINGLE-ELEMENT PUSH / POP
    // ---------------------------------------------------------------------

    /// Attempts to push one element, taking ownership of `value` regardless
    /// of outcome: on failure (ring full) `value` is simply dropped, the same
    /// convention an unbuffered `try_send` uses when it can't enqueue.
    #[inline]
    pub fn try_push(&self, value: T) -> bool {
        self.try_push_move(value).is_ok()
    }

    fn try_push_move(&self, value: T) -> Result<(), T> {
        let push_index = self.push_index.load(Ordering::Relaxed);
        let pop_index = self.pop_index.load(Ordering::Acquire);
        debug_assert_index_in_range!("push_index", push_index, self.index_end);

        let delta = push_index - pop_index;
        let capacity = self.capacity as i32;
        let full = delta == capacity || delta == capacity - self.index_end;
        if full {
            return Err(value);
        }

        let slot = (push_index as usize) % self.capacity;
        // SAFETY: slot is beyond the consumer's observed prefix (delta < capacity),
        // so it is producer-owned and currently uninitialised.
        unsafe { (*self.storage.add(slot)).write(value) };

        let mut new_push_index = push_index + 1;
        if new_push_index == self.index_end {
            new_push_index = 0;
        }
        self.push_index.store(new_push_index, Ordering::Release);
        self.increment_size_and_maybe_notify(1);
        Ok(())
    }

    /// Attempts to pop one element. Returns `None` iff the ring is empty.
    #[inline]
    pub fn try_pop(&self) -> Option<T> {
        let push_index = self.push_index.load(Ordering::Acquire);
        let pop_index = self.pop_index.load(Ordering::Relaxed);
        debug_assert_index_in_range!("pop_index", pop_index, self.index_end);

        if push_index == pop_index {
            return None;
        }
        debug_assert_initialized_read!(pop_index, pop_index, push_index);

        let slot = (pop_index as usize) % self.capacity;
        // SAFETY: slot in [pop_index, push_index) was published by the
        // producer's Release store on push_index, observed above with Acquire.
        let value = unsafe { (*self.storage.add(slot)).assume_init_read() };

        let mut new_pop_index = pop_index + 1;
        if new_pop_index == self.index_end {
            new_pop_index = 0;
        }
        self.pop_index.store(new_pop_index, Ordering::Release);
        self.decrement_size_and_maybe_notify(1);
        Some(value)
    }

    // ---------------------------------------------------------------------
    // BATCH OPERATIONS (SPEC_FULL.md section 4.4)
    // ---------------------------------------------------------------------

    /// Moves as many elements from the front of `items` into the ring as fit,
    /// publishing a single `push_index` release store for the whole batch.
    /// Returns the unconsumed remainder.
    pub fn push_many(&self, mut items: Vec<T>) -> Vec<T> {
        if items.is_empty() {
            return items;
        }

        let push_index = self.push_index.load(Ordering::Relaxed);
        let pop_index = self.pop_index.load(Ordering::Acquire);

        let mut space = i64::from(pop_index) + self.capacity as i64 - i64::from(push_index);
        if space > i64::from(self.index_end) {
            space -= i64::from(self.index_end);
        }
        let space = usize::try_from(space.max(0)).unwrap_or(0);
        let n = items.len().min(space);
        if n == 0 {
            return items;
        }

        let start_slot = (push_index as usize) % self.capacity;
        let first_run = n.min(self.capacity - start_slot);
        let second_run = n - first_run;

        // SAFETY: the `n <= space` slots starting at start_slot (wrapping
        // once through the buffer end) are producer-owned and uninitialised.
        unsafe {
            for (i, item) in items.drain(..first_run).enumerate() {
                (*self.storage.add(start_slot + i)).write(item);
            }
            for (i, item) in items.drain(..second_run).enumerate() {
                (*self.storage.add(i)).write(item);
            }
        }

        let mut new_push_index = push_index + n as i32;
        if new_push_index >= self.index_end {
            new_push_index -= self.index_end;
        }
        debug_assert_bounded_count!(
            (i64::from(new_push_index) - i64::from(pop_index)).rem_euclid(i64::from(self.index_end)),
            self.capacity as i64
        );
        self.push_index.store(new_push_index, Ordering::Release);
        self.increment_size_and_maybe_notify(n as u32);

        items
    }

    /// Fills `out` (up to its free capacity, i.e. `out.capacity() - out.len()`)
    /// with moved-out elements in FIFO order. Returns the number appended;
    /// appends nothing and returns 0 when the ring is empty or `out` has no
    /// spare capacity.
    pub fn pop_many(&self, out: &mut Vec<T>) -> usize {
        let free = out.capacity().saturating_sub(out.len());
        if free == 0 {
            return 0;
        }

        let push_index = self.push_index.load(Ordering::Acquire);
        let pop_index = self.pop_index.load(Ordering::Relaxed);

        let mut delta = i64::from(push_index) - i64::from(pop_index);
        if delta < 0 {
            delta += i64::from(self.index_end);
        }
        let avail = usize::try_from(delta).unwrap_or(0);
        let n = avail.min(free);
        if n == 0 {
            return 0;
        }

        let start_slot = (pop_index as usize) % self.capacity;
        let first_run = n.min(self.capacity - start_slot);
        let second_run = n - first_run;

        // SAFETY: the `n <= avail` slots starting at start_slot were
        // published by the producer's Release store observed above.
        unsafe {
            for i in 0..first_run {
                out.push((*self.storage.add(start_slot + i)).assume_init_read());
            }
            for i in 0..second_run {
                out.push((*self.storage.add(i)).assume_init_read());
            }
        }

        let mut new_pop_index = pop_index + n as i32;
        if new_pop_index >= self.index_end {
            new_pop_index -= self.index_end;
        }
        self.pop_index.store(new_pop_index, Ordering::Release);
        self.decrement_size_and_maybe_notify(n as u32);

        n
    }
}

impl<T, W: WaitPolicy> Default for Ring<T, W> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// WAIT POLICY - gated inherent methods (SPEC_FULL.md section 4.6)
// =============================================================================

impl<T, W: PushWaitable> Ring<T, W> {
    /// Retries `try_push` until it succeeds, blocking between attempts while
    /// the ring is observed full.
    pub fn push_wait(&self, mut value: T) {
        loop {
            match self.try_push_move(value) {
                Ok(()) => return,
                Err(v) => value = v,
            }
            let observed = self.size.load(Ordering::Acquire);
            if (observed & COUNT_MASK) == self.capacity as u32 {
                wait::wait(&self.size, observed);
            }
        }
    }

    /// Blocking `push_many`: loops `push_many` around the wait primitive
    /// until every element has been pushed.
    pub fn push_many_wait(&self, mut items: Vec<T>) {
        while !items.is_empty() {
            let before = items.len();
            items = self.push_many(items);
            if items.len() == before {
                let observed = self.size.load(Ordering::Acquire);
                if (observed & COUNT_MASK) == self.capacity as u32 {
                    wait::wait(&self.size, observed);
                }
            }
        }
    }
}

impl<T, W: PopWaitable> Ring<T, W> {
    /// Retries `try_pop` until it succeeds or the ring is closed and drained.
    ///
    /// Returns `None` iff [`Ring::end_pop_waiting`] has been called and the
    /// ring has since been fully drained.
    pub fn pop_wait(&self) -> Option<T> {
        loop {
            if let Some(value) = self.try_pop() {
                return Some(value);
            }
            let observed = self.size.load(Ordering::Acquire);
            if observed & TERMINAL_BIT != 0 {
                return None;
            }
            if (observed & COUNT_MASK) == 0 {
                wait::wait(&self.size, observed);
            }
        }
    }

    /// Blocking `pop_many`: loops `pop_many` around the wait primitive until
    /// at least one element is appended, or the ring is closed and empty.
    pub fn pop_many_wait(&self, out: &mut Vec<T>) -> usize {
        loop {
            let n = self.pop_many(out);
            if n > 0 {
                return n;
            }
            let observed = self.size.load(Ordering::Acquire);
            if observed & TERMINAL_BIT != 0 {
                return 0;
            }
            wait::wait(&self.size, observed);
        }
    }

    /// Producer-side shutdown: marks the pop side *Closed*. Blocked
    /// `pop_wait` calls wake and return `None` once the ring drains.
    pub fn end_pop_waiting(&self) {
        let prev = self.size.fetch_or(TERMINAL_BIT, Ordering::Release);
        tracing::debug!("end_pop_waiting");
        if prev == 0 {
            wait::wake_all(&self.size);
            if self.enable_metrics {
                self.metrics.add_futex_wake();
            }
        }
    }

    /// Clears the terminal flag, returning the pop side to *Running*.
    pub fn reset_pop_waiting(&self) {
        self.size.fetch_and(!TERMINAL_BIT, Ordering::Relaxed);
        tracing::debug!("reset_pop_waiting");
    }

    /// Returns true if [`Ring::end_pop_waiting`] has been called and not
    /// since reset.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.size.load(Ordering::Acquire) & TERMINAL_BIT != 0
    }
}

impl<T, W> Drop for Ring<T, W> {
    fn drop(&mut self) {
        assert!(
            self.storage.is_null(),
            "Ring dropped while still allocated; call free() before dropping"
        );
    }
}
