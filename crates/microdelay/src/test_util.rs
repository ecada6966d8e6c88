//! In-crate test support: a scripted timer backend.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::backend::TimerBackend;
use crate::error::{DelayError, DelayResult};
use crate::notify::TaskNotify;

/// Shared recording state, kept outside the backend so tests retain access
/// after the backend moves into an engine.
#[derive(Default)]
pub(crate) struct StubState {
    clock_us: AtomicU64,
    clock_step_us: AtomicU64,
    created: AtomicUsize,
    deleted: AtomicUsize,
    armed: Mutex<Vec<u64>>,
    busy_waits: Mutex<Vec<u64>>,
    fail_create: AtomicBool,
    fail_arm: AtomicBool,
}

impl StubState {
    pub(crate) fn set_clock_step_us(&self, step_us: u64) {
        self.clock_step_us.store(step_us, Ordering::Relaxed);
    }

    pub(crate) fn fail_next_create(&self) {
        self.fail_create.store(true, Ordering::Relaxed);
    }

    pub(crate) fn fail_next_arm(&self) {
        self.fail_arm.store(true, Ordering::Relaxed);
    }

    pub(crate) fn created(&self) -> usize {
        self.created.load(Ordering::Relaxed)
    }

    pub(crate) fn deleted(&self) -> usize {
        self.deleted.load(Ordering::Relaxed)
    }

    pub(crate) fn armed(&self) -> Vec<u64> {
        self.armed.lock().clone()
    }

    pub(crate) fn busy_waits(&self) -> Vec<u64> {
        self.busy_waits.lock().clone()
    }
}

/// Timer backend that records every interaction and delivers expiry
/// notifications inline, so a delayed task resumes immediately.
pub(crate) struct StubTimer {
    state: Arc<StubState>,
}

pub(crate) struct StubHandle {
    waker: Arc<TaskNotify>,
}

impl StubTimer {
    pub(crate) fn new() -> Self {
        Self {
            state: Arc::new(StubState::default()),
        }
    }

    pub(crate) fn state(&self) -> Arc<StubState> {
        Arc::clone(&self.state)
    }
}

impl TimerBackend for StubTimer {
    type Handle = StubHandle;

    fn create(&self, waker: Arc<TaskNotify>) -> DelayResult<StubHandle> {
        if self.state.fail_create.swap(false, Ordering::Relaxed) {
            return Err(DelayError::ResourceExhausted(
                "no free timer slots".to_string(),
            ));
        }
        self.state.created.fetch_add(1, Ordering::Relaxed);
        Ok(StubHandle { waker })
    }

    fn start_once(&self, handle: &StubHandle, duration_us: u64) -> DelayResult {
        if self.state.fail_arm.swap(false, Ordering::Relaxed) {
            return Err(DelayError::ArmFailed("timer is not idle".to_string()));
        }
        self.state.armed.lock().push(duration_us);
        handle.waker.notify();
        Ok(())
    }

    fn delete(&self, _handle: &StubHandle) {
        self.state.deleted.fetch_add(1, Ordering::Relaxed);
    }

    fn busy_wait_us(&self, duration_us: u64) {
        self.state.busy_waits.lock().push(duration_us);
    }

    fn now_us(&self) -> u64 {
        self.state
            .clock_us
            .fetch_add(self.state.clock_step_us.load(Ordering::Relaxed), Ordering::Relaxed)
    }
}
