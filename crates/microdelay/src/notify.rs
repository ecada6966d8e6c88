//! One-slot task notification for the timer-to-task wake handshake.
//!
//! A [`TaskNotify`] is bound to the task that creates it. The bound task blocks
//! in [`wait`](TaskNotify::wait); the timer expiry path delivers exactly one
//! wake through [`notify`](TaskNotify::notify). The signalling side runs
//! outside any task's normal context, so it is restricted to a single atomic
//! store plus an unpark.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, Thread};

/// One-slot wake notification bound to a single task.
///
/// Semantics match a binary task notification: `notify` sets the slot and
/// wakes the bound task if it is blocked; `wait` consumes the slot, blocking
/// until it is set. A notification delivered before `wait` is not lost.
#[derive(Debug)]
pub struct TaskNotify {
    pending: AtomicBool,
    task: Thread,
}

impl TaskNotify {
    /// Create a notification slot bound to the calling task.
    #[must_use]
    pub fn for_current_task() -> Arc<Self> {
        Arc::new(Self {
            pending: AtomicBool::new(false),
            task: thread::current(),
        })
    }

    /// Deliver one wake to the bound task.
    ///
    /// Safe to call from any context: a single release store followed by an
    /// unpark, with no allocation and no locking. Redundant notifications
    /// collapse into the one pending slot.
    pub fn notify(&self) {
        self.pending.store(true, Ordering::Release);
        self.task.unpark();
    }

    /// Block the bound task until a notification is pending, then consume it.
    ///
    /// There is no timeout; the caller resumes only when a notification
    /// arrives. Must be invoked from the bound task.
    pub fn wait(&self) {
        debug_assert_eq!(
            thread::current().id(),
            self.task.id(),
            "wait() invoked from a task other than the bound one"
        );
        while !self.pending.swap(false, Ordering::Acquire) {
            thread::park();
        }
    }
}
