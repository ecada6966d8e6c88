//! Linux precision sleep for the timer expiry workers.

use std::time::{Duration, Instant};

use libc::{CLOCK_MONOTONIC, clock_nanosleep, timespec};

/// Width of the busy-spin tail. clock_nanosleep reliably wakes within a few
/// tens of microseconds; the tail absorbs the remainder.
const SPIN_TAIL_US: u64 = 50;

/// Sleep until `target` using clock_nanosleep for the bulk of the wait, then
/// busy-spin for the final stretch.
pub(crate) fn sleep_until(target: Instant) {
    let now = Instant::now();
    if target <= now {
        return;
    }

    let duration = target.duration_since(now);
    if duration > Duration::from_micros(SPIN_TAIL_US) {
        let sleep_duration = duration - Duration::from_micros(SPIN_TAIL_US);
        let ts = timespec {
            tv_sec: sleep_duration.as_secs() as i64,
            tv_nsec: i64::from(sleep_duration.subsec_nanos()),
        };

        // SAFETY: ts is a valid relative timespec and a null remainder
        // pointer is permitted for relative sleeps. An EINTR return leaves
        // the remainder to the spin loop below.
        unsafe {
            clock_nanosleep(CLOCK_MONOTONIC, 0, &ts, std::ptr::null_mut());
        }
    }

    while Instant::now() < target {
        std::hint::spin_loop();
    }
}
