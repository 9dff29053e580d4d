//! The allocator contract the [`crate::Ring`] consumes.
//!
//! The Ring owns no allocation machinery itself: it calls out to a
//! caller-supplied [`RingAllocator`] at `allocate`/`free` time. This keeps the
//! storage lifecycle pluggable (arena allocators, NUMA-aware allocators,
//! stack/bump allocators for tests) without the Ring needing to know about
//! any of them.

use std::alloc::{self, Layout};
use std::ptr::NonNull;

/// External allocator contract.
///
/// Implementors must tolerate arbitrary alignment up to what was requested
/// and must return a buffer that compares equal (by address) across
/// `allocate`/`deallocate` pairs so double-frees and mismatched layouts can
/// be caught by the allocator itself if desired.
pub trait RingAllocator {
    /// Request a buffer of at least `layout.size()` bytes aligned to
    /// `layout.align()`. Returns `None` to signal out-of-memory.
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>>;

    /// Return a buffer previously obtained from [`RingAllocator::allocate`]
    /// with the same `layout`.
    ///
    /// # Safety
    ///
    /// `ptr` must have been returned by a prior call to `allocate` on this
    /// same allocator with an identical `layout`, and must not be used again
    /// afterwards.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);
}

/// Default allocator backed by the global allocator (`std::alloc`).
#[derive(Debug, Default, Clone, Copy)]
pub struct GlobalRingAllocator;

impl RingAllocator for GlobalRingAllocator {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        if layout.size() == 0 {
            // A capacity of 0 is rejected before we get here, but a
            // zero-sized T is legal, so guard the degenerate allocation.
            return NonNull::new(layout.align() as *mut u8);
        }
        // SAFETY: layout has non-zero size, as required by `alloc::alloc`.
        let raw = unsafe { alloc::alloc(layout) };
        NonNull::new(raw)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() == 0 {
            return;
        }
        // SAFETY: caller guarantees ptr/layout match a prior `allocate` call.
        unsafe { alloc::dealloc(ptr.as_ptr(), layout) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_allocator_round_trip() {
        let alloc = GlobalRingAllocator;
        let layout = Layout::from_size_align(128, 64).unwrap();
        let ptr = alloc.allocate(layout).expect("allocation should succeed");
        assert_eq!(ptr.as_ptr() as usize % 64, 0);
        unsafe { alloc.deallocate(ptr, layout) };
    }
}
