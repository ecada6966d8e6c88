//! Portable precision sleep for targets without clock_nanosleep.

use std::time::{Duration, Instant};

/// Width of the busy-spin tail. std::thread::sleep wakes late by up to a
/// scheduler quantum, so the tail is wider than on Linux.
const SPIN_TAIL_US: u64 = 200;

/// Sleep until `target` using the standard library sleep for the bulk of the
/// wait, then busy-spin for the final stretch.
pub(crate) fn sleep_until(target: Instant) {
    let now = Instant::now();
    if target > now {
        let duration = target.duration_since(now);
        if duration > Duration::from_micros(SPIN_TAIL_US) {
            std::thread::sleep(duration - Duration::from_micros(SPIN_TAIL_US));
        }
    }

    while Instant::now() < target {
        std::hint::spin_loop();
    }
}
