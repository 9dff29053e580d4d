//! Compile-time wait policy selection.
//!
//! `Ring<T, W>` is generic over a zero-sized marker type `W` that says which
//! side(s), if any, may block waiting for the other. Operations forbidden by
//! the chosen policy are simply not implemented for that `W`, so calling
//! `pop_wait` on a `Ring<T, NoWait>` is a compile error rather than a runtime
//! panic or a `None`/`false` sentinel.

use std::sync::atomic::Ordering;

/// No side may block. `try_push`/`try_pop` only.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoWait;

/// Only the producer may block (`push_wait`).
#[derive(Debug, Default, Clone, Copy)]
pub struct PushWait;

/// Only the consumer may block (`pop_wait`, `end_pop_waiting`, `reset_pop_waiting`).
#[derive(Debug, Default, Clone, Copy)]
pub struct PopWait;

/// Both sides may block.
#[derive(Debug, Default, Clone, Copy)]
pub struct BothWait;

/// Sealed supertrait selecting the memory ordering for the `size` counter.
///
/// The ordering on the size counter's increment/decrement is release when
/// the *other* side may wait on it (so that side's acquire wait observes the
/// published indices), relaxed otherwise. See SPEC_FULL.md §4.5.
pub trait WaitPolicy: sealed::Sealed + Send + Sync + 'static {
    /// Whether the pop side may call `pop_wait`.
    const POP_WAITABLE: bool;
    /// Whether the push side may call `push_wait`.
    const PUSH_WAITABLE: bool;

    /// Ordering to use when the producer publishes a push-side size update.
    #[inline]
    fn push_size_ordering() -> Ordering {
        if Self::POP_WAITABLE {
            Ordering::Release
        } else {
            Ordering::Relaxed
        }
    }

    /// Ordering to use when the consumer publishes a pop-side size update.
    #[inline]
    fn pop_size_ordering() -> Ordering {
        if Self::PUSH_WAITABLE {
            Ordering::Release
        } else {
            Ordering::Relaxed
        }
    }
}

/// Marker trait implemented by policies that permit `push_wait`.
pub trait PushWaitable: WaitPolicy {}
/// Marker trait implemented by policies that permit `pop_wait`.
pub trait PopWaitable: WaitPolicy {}

impl WaitPolicy for NoWait {
    const POP_WAITABLE: bool = false;
    const PUSH_WAITABLE: bool = false;
}
impl WaitPolicy for PushWait {
    const POP_WAITABLE: bool = false;
    const PUSH_WAITABLE: bool = true;
}
impl WaitPolicy for PopWait {
    const POP_WAITABLE: bool = true;
    const PUSH_WAITABLE: bool = false;
}
impl WaitPolicy for BothWait {
    const POP_WAITABLE: bool = true;
    const PUSH_WAITABLE: bool = true;
}

impl PushWaitable for PushWait {}
impl PushWaitable for BothWait {}
impl PopWaitable for PopWait {}
impl PopWaitable for BothWait {}

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::NoWait {}
    impl Sealed for super::PushWait {}
    impl Sealed for super::PopWait {}
    impl Sealed for super::BothWait {}
}
