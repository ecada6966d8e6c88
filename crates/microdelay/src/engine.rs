//! Delay engine: per-task timer ownership and the busy-wait/blocking dispatch.
//!
//! Each task lazily owns one one-shot timer, created on its first delay and
//! recycled for every subsequent call. Requested durations at or below the
//! measured wake overhead busy-wait; anything longer arms the task's timer
//! for the remainder and blocks on its notification slot.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, ThreadId};

use parking_lot::RwLock;
use tracing::debug;

use crate::backend::TimerBackend;
use crate::error::DelayResult;
use crate::notify::TaskNotify;

/// A task's timer resource and the notification slot its expiry targets.
pub(crate) struct TaskSlot<B: TimerBackend> {
    pub(crate) handle: B::Handle,
    pub(crate) notify: Arc<TaskNotify>,
}

/// Delay engine over a platform timer backend.
///
/// The engine owns the task-identity → timer-handle table and the shared
/// compensation value. One instance serves any number of tasks; a task
/// blocking in [`delay`](Self::delay) blocks only itself.
///
/// # RT-Safety
///
/// - The delay hot path performs no heap allocation after a task's first call
/// - The compensation value is a relaxed atomic load on every call
/// - The handle table takes a short read lock on the hot path; the write lock
///   is only taken on first use and on release
pub struct DelayEngine<B: TimerBackend> {
    pub(crate) backend: B,
    compensation_us: AtomicU64,
    slots: RwLock<HashMap<ThreadId, Arc<TaskSlot<B>>>>,
}

impl<B: TimerBackend> DelayEngine<B> {
    /// Create an engine with the compensation value at zero.
    ///
    /// Until [`calibrate`](Self::calibrate) runs (or a stored value is
    /// restored through [`set_compensation_us`](Self::set_compensation_us)),
    /// every non-zero delay takes the timer path.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            compensation_us: AtomicU64::new(0),
            slots: RwLock::new(HashMap::new()),
        }
    }

    /// Block the calling task for approximately `duration_us` microseconds.
    ///
    /// `delay(0)` returns immediately but still performs the lazy timer
    /// creation, so a task can pre-warm its slot before timing-critical work.
    /// Durations at or below the compensation value busy-wait for exactly the
    /// requested time; the timer is never armed for them. Longer durations
    /// arm the task's one-shot timer for `duration_us - compensation` and
    /// block with no timeout until the expiry notification arrives.
    ///
    /// # Errors
    ///
    /// [`DelayError::ResourceExhausted`](crate::DelayError::ResourceExhausted)
    /// if the task's timer cannot be created, or
    /// [`DelayError::ArmFailed`](crate::DelayError::ArmFailed) if arming is
    /// rejected. On error the task has not blocked and no partial delay has
    /// happened.
    pub fn delay(&self, duration_us: u64) -> DelayResult {
        let slot = self.task_slot()?;

        if duration_us == 0 {
            return Ok(());
        }

        // Arming the timer costs at least the compensation value of
        // irreducible overhead; below that, spinning is no less efficient
        // and avoids the timer churn.
        let compensation = self.compensation_us.load(Ordering::Relaxed);
        if duration_us <= compensation {
            self.backend.busy_wait_us(duration_us);
            return Ok(());
        }

        self.backend
            .start_once(&slot.handle, duration_us - compensation)?;
        slot.notify.wait();
        Ok(())
    }

    /// Current compensation value in microseconds.
    #[must_use]
    pub fn compensation_us(&self) -> u64 {
        self.compensation_us.load(Ordering::Relaxed)
    }

    /// Overwrite the compensation value.
    ///
    /// Normally the calibrator's job; exposed so a value measured on a
    /// previous run can be restored without re-calibrating.
    pub fn set_compensation_us(&self, compensation_us: u64) {
        self.compensation_us.store(compensation_us, Ordering::Relaxed);
    }

    /// Drop the calling task's timer resource, if it has one.
    ///
    /// The next delay from this task re-creates the timer. Tasks that never
    /// release keep their timer until the engine itself is dropped; there is
    /// no forced teardown hook on hosted platforms, so a task that exits
    /// without releasing leaves its entry in the table.
    pub fn release_current_task(&self) {
        let id = thread::current().id();
        if let Some(slot) = self.slots.write().remove(&id) {
            self.backend.delete(&slot.handle);
            debug!(task = ?id, "released delay timer");
        }
    }

    /// Number of tasks currently holding a timer.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.slots.read().len()
    }

    /// Fetch the calling task's slot, creating timer and notification on
    /// first use. Creation failure is surfaced, not retried.
    fn task_slot(&self) -> DelayResult<Arc<TaskSlot<B>>> {
        let id = thread::current().id();
        if let Some(slot) = self.slots.read().get(&id) {
            return Ok(Arc::clone(slot));
        }

        let notify = TaskNotify::for_current_task();
        let handle = self.backend.create(Arc::clone(&notify))?;
        let slot = Arc::new(TaskSlot { handle, notify });
        self.slots.write().insert(id, Arc::clone(&slot));
        debug!(task = ?id, "created one-shot delay timer");
        Ok(slot)
    }
}

impl<B: TimerBackend> Drop for DelayEngine<B> {
    fn drop(&mut self) {
        for (_, slot) in self.slots.write().drain() {
            self.backend.delete(&slot.handle);
        }
    }
}
