//! Shared test support: a scripted timer backend that records every
//! interaction with the delay engine.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use parking_lot::Mutex;

use microdelay::{DelayError, DelayResult, TaskNotify, TimerBackend};

/// Recording state shared between the backend handed to an engine and the
/// test body observing it.
#[derive(Default)]
pub struct MockState {
    clock_us: AtomicU64,
    clock_step_us: AtomicU64,
    created: AtomicUsize,
    deleted: AtomicUsize,
    armed: Mutex<Vec<u64>>,
    busy_waits: Mutex<Vec<u64>>,
    fail_create: AtomicBool,
    fail_arm: AtomicBool,
}

impl MockState {
    /// Advance the scripted clock by `step_us` on every `now_us` call.
    pub fn set_clock_step_us(&self, step_us: u64) {
        self.clock_step_us.store(step_us, Ordering::Relaxed);
    }

    /// Make the next timer creation fail with resource exhaustion.
    pub fn fail_next_create(&self) {
        self.fail_create.store(true, Ordering::Relaxed);
    }

    /// Make the next arm attempt fail.
    pub fn fail_next_arm(&self) {
        self.fail_arm.store(true, Ordering::Relaxed);
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::Relaxed)
    }

    pub fn deleted(&self) -> usize {
        self.deleted.load(Ordering::Relaxed)
    }

    pub fn armed(&self) -> Vec<u64> {
        self.armed.lock().clone()
    }

    pub fn busy_waits(&self) -> Vec<u64> {
        self.busy_waits.lock().clone()
    }

    /// Forget recorded arms and busy-waits, keeping counters and the clock.
    pub fn clear_recordings(&self) {
        self.armed.lock().clear();
        self.busy_waits.lock().clear();
    }
}

/// Timer backend that records creations, arms, busy-waits and deletions, and
/// delivers expiry notifications inline so a delayed task resumes at once.
pub struct MockTimer {
    state: Arc<MockState>,
}

pub struct MockHandle {
    waker: Arc<TaskNotify>,
}

impl MockTimer {
    pub fn new() -> Self {
        Self {
            state: Arc::new(MockState::default()),
        }
    }

    pub fn state(&self) -> Arc<MockState> {
        Arc::clone(&self.state)
    }
}

impl Default for MockTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerBackend for MockTimer {
    type Handle = MockHandle;

    fn create(&self, waker: Arc<TaskNotify>) -> DelayResult<MockHandle> {
        if self.state.fail_create.swap(false, Ordering::Relaxed) {
            return Err(DelayError::ResourceExhausted(
                "no free timer slots".to_string(),
            ));
        }
        self.state.created.fetch_add(1, Ordering::Relaxed);
        Ok(MockHandle { waker })
    }

    fn start_once(&self, handle: &MockHandle, duration_us: u64) -> DelayResult {
        if self.state.fail_arm.swap(false, Ordering::Relaxed) {
            return Err(DelayError::ArmFailed("timer is not idle".to_string()));
        }
        self.state.armed.lock().push(duration_us);
        handle.waker.notify();
        Ok(())
    }

    fn delete(&self, _handle: &MockHandle) {
        self.state.deleted.fetch_add(1, Ordering::Relaxed);
    }

    fn busy_wait_us(&self, duration_us: u64) {
        self.state.busy_waits.lock().push(duration_us);
    }

    fn now_us(&self) -> u64 {
        self.state.clock_us.fetch_add(
            self.state.clock_step_us.load(Ordering::Relaxed),
            Ordering::Relaxed,
        )
    }
}
