//! Hosted binding of the one-shot timer subsystem.
//!
//! Each created handle owns a dedicated expiry worker that stays parked while
//! the timer is idle. Arming publishes an absolute deadline and unparks the
//! worker; the worker sleeps to the deadline with the platform's precision
//! sleep and then delivers the wake notification. Deletion shuts the worker
//! down and joins it.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::thread::{self, JoinHandle, Thread};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::backend::TimerBackend;
use crate::error::{DelayError, DelayResult};
use crate::notify::TaskNotify;

#[cfg(target_os = "linux")]
use crate::linux::sleep_until;

#[cfg(not(target_os = "linux"))]
use crate::fallback::sleep_until;

const STATE_IDLE: u8 = 0;
const STATE_ARMED: u8 = 1;
const STATE_SHUTDOWN: u8 = 2;

/// State shared between a timer handle and its expiry worker.
struct TimerShared {
    state: AtomicU8,
    /// Absolute deadline in microseconds since the backend epoch. Valid only
    /// while `state` is `STATE_ARMED`.
    deadline_us: AtomicU64,
    waker: Arc<TaskNotify>,
}

/// One-shot timer resource backed by a dedicated expiry worker.
pub struct SystemHandle {
    shared: Arc<TimerShared>,
    worker: Thread,
    join: Option<JoinHandle<()>>,
}

impl Drop for SystemHandle {
    fn drop(&mut self) {
        self.shared.state.store(STATE_SHUTDOWN, Ordering::Release);
        self.worker.unpark();
        if let Some(join) = self.join.take() {
            if join.join().is_err() {
                debug!("delay timer worker exited with a panic");
            }
        }
    }
}

/// Hosted timer subsystem: spawns one expiry worker per created timer and
/// derives the monotonic microsecond clock from a fixed epoch.
pub struct SystemTimer {
    epoch: Instant,
}

impl SystemTimer {
    /// Create the backend. The monotonic clock starts at zero here.
    #[must_use]
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerBackend for SystemTimer {
    type Handle = SystemHandle;

    fn create(&self, waker: Arc<TaskNotify>) -> DelayResult<SystemHandle> {
        let shared = Arc::new(TimerShared {
            state: AtomicU8::new(STATE_IDLE),
            deadline_us: AtomicU64::new(0),
            waker,
        });

        let worker_shared = Arc::clone(&shared);
        let epoch = self.epoch;
        let join = thread::Builder::new()
            .name("microdelay-timer".to_string())
            .spawn(move || expiry_worker(&worker_shared, epoch))
            .map_err(|e| DelayError::ResourceExhausted(e.to_string()))?;

        let worker = join.thread().clone();
        Ok(SystemHandle {
            shared,
            worker,
            join: Some(join),
        })
    }

    fn start_once(&self, handle: &SystemHandle, duration_us: u64) -> DelayResult {
        let deadline = self.now_us().saturating_add(duration_us);
        handle.shared.deadline_us.store(deadline, Ordering::Relaxed);

        if handle
            .shared
            .state
            .compare_exchange(
                STATE_IDLE,
                STATE_ARMED,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_err()
        {
            return Err(DelayError::ArmFailed(
                "one-shot timer is not idle".to_string(),
            ));
        }

        handle.worker.unpark();
        Ok(())
    }

    fn delete(&self, handle: &SystemHandle) {
        handle.shared.state.store(STATE_SHUTDOWN, Ordering::Release);
        handle.worker.unpark();
    }

    fn busy_wait_us(&self, duration_us: u64) {
        let target = Instant::now() + Duration::from_micros(duration_us);
        while Instant::now() < target {
            std::hint::spin_loop();
        }
    }

    fn now_us(&self) -> u64 {
        self.epoch.elapsed().as_micros() as u64
    }
}

/// Expiry loop: park while idle, sleep to the published deadline while armed,
/// deliver exactly one wake per arm.
fn expiry_worker(shared: &TimerShared, epoch: Instant) {
    loop {
        match shared.state.load(Ordering::Acquire) {
            STATE_SHUTDOWN => return,
            STATE_ARMED => {
                let deadline =
                    epoch + Duration::from_micros(shared.deadline_us.load(Ordering::Relaxed));
                sleep_until(deadline);
                // Shutdown may have raced the sleep; only a still-armed timer
                // notifies.
                if shared
                    .state
                    .compare_exchange(
                        STATE_ARMED,
                        STATE_IDLE,
                        Ordering::AcqRel,
                        Ordering::Acquire,
                    )
                    .is_ok()
                {
                    shared.waker.notify();
                }
            }
            _ => thread::park(),
        }
    }
}
