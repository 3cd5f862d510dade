//! Monotonic clock hook.
//!
//! Commit timestamps feed the cursor idle heuristic; the time source itself
//! belongs to the host. Until one is attached, `now_ns` reads 0 and every
//! idle window appears already expired.

use spin::Once;

/// Monotonic nanosecond counter provided by the host.
pub type ClockNs = fn() -> u64;

static CLOCK: Once<ClockNs> = Once::new();

/// Attach the host clock. Only the first registration wins.
pub fn clock_attach(clock: ClockNs) {
    CLOCK.call_once(|| clock);
}

/// Current monotonic time in nanoseconds, 0 if no clock is attached.
#[inline]
pub fn now_ns() -> u64 {
    match CLOCK.get() {
        Some(clock) => clock(),
        None => 0,
    }
}
