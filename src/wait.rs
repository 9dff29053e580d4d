//! Futex-style wait/wake primitive used by the `*_wait` family of operations.
//!
//! On Linux this is a thin wrapper over the `futex(2)` syscall, using the
//! process-private variants (`FUTEX_WAIT_PRIVATE`/`FUTEX_WAKE_PRIVATE`)
//! because a `Ring` only ever lives inside one process's address space —
//! unlike a shared-memory transport, there is no cross-process waiter to
//! support here. On other targets it falls back to a bounded backoff sleep
//! loop: still correct (it just polls), since nothing below this module
//! assumes the wait actually blocks rather than spin-sleeps.

use std::sync::atomic::AtomicU32;
use std::time::Duration;

#[cfg(target_os = "linux")]
const FUTEX_WAIT_PRIVATE: i32 = 0 | 128;
#[cfg(target_os = "linux")]
const FUTEX_WAKE_PRIVATE: i32 = 1 | 128;

/// Block while `addr` holds `expected`, waking on a matching [`wake_all`].
///
/// Spurious wakes are possible and must be absorbed by the caller's retry
/// loop; this primitive makes no promise about exactly when it returns other
/// than "not forever, once a wake has been issued or `expected` changes".
#[cfg(target_os = "linux")]
pub(crate) fn wait(addr: &AtomicU32, expected: u32) {
    tracing::trace!(expected, "futex wait");
    // SAFETY: `addr` is a valid, live `AtomicU32` for the duration of the call.
    unsafe {
        libc::syscall(
            libc::SYS_futex,
            addr as *const AtomicU32 as *const u32,
            FUTEX_WAIT_PRIVATE,
            expected,
            std::ptr::null::<libc::timespec>(),
            std::ptr::null::<u32>(),
            0i32,
        );
    }
}

#[cfg(target_os = "linux")]
pub(crate) fn wake_all(addr: &AtomicU32) {
    tracing::trace!("futex wake_all");
    // SAFETY: `addr` is a valid, live `AtomicU32` for the duration of the call.
    unsafe {
        libc::syscall(
            libc::SYS_futex,
            addr as *const AtomicU32 as *const u32,
            FUTEX_WAKE_PRIVATE,
            i32::MAX,
            std::ptr::null::<libc::timespec>(),
            std::ptr::null::<u32>(),
            0i32,
        );
    }
}

/// Non-Linux fallback: bounded sleep so the wait loop doesn't spin the CPU
/// at 100%. Not a true futex; correctness relies only on the caller
/// re-checking its condition after returning, which every `*_wait` loop does.
#[cfg(not(target_os = "linux"))]
pub(crate) fn wait(_addr: &AtomicU32, expected: u32) {
    tracing::trace!(expected, "futex wait (sleep fallback)");
    std::thread::sleep(Duration::from_micros(50));
}

#[cfg(not(target_os = "linux"))]
pub(crate) fn wake_all(_addr: &AtomicU32) {
    tracing::trace!("futex wake_all (sleep fallback, no-op)");
    // No real waiters to target off Linux; the sleeping side will re-poll.
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn wake_wakes_a_blocked_waiter() {
        let val = Arc::new(AtomicU32::new(0));
        let val2 = Arc::clone(&val);

        let handle = thread::spawn(move || {
            while val2.load(Ordering::Acquire) == 0 {
                wait(&val2, 0);
            }
            val2.load(Ordering::Acquire)
        });

        thread::sleep(Duration::from_millis(10));
        val.store(7, Ordering::Release);
        wake_all(&val);

        assert_eq!(handle.join().unwrap(), 7);
    }

    #[test]
    fn wake_without_waiters_does_not_panic() {
        let val = AtomicU32::new(0);
        wake_all(&val);
    }
}
