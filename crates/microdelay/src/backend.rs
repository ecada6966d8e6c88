//! Platform timer abstraction consumed by the delay engine.
//!
//! The engine only ever touches the timer subsystem, the busy-wait primitive
//! and the monotonic clock through this trait. The shipped implementation is
//! [`SystemTimer`](crate::system::SystemTimer); tests substitute a scripted
//! backend to observe the dispatch policy.

use std::sync::Arc;

use crate::error::DelayResult;
use crate::notify::TaskNotify;

/// One-shot timer subsystem, busy-wait primitive and monotonic clock.
///
/// A handle created through this trait is bound 1:1 to the wake notification
/// passed at creation, so that expiry can target exactly the owning task.
pub trait TimerBackend: Send + Sync {
    /// Opaque per-task timer resource.
    type Handle: Send + Sync;

    /// Create a one-shot timer whose expiry delivers a wake through `waker`.
    ///
    /// The expiry path must be non-blocking and allocation-free; it runs
    /// outside any task's normal context.
    ///
    /// # Errors
    ///
    /// Returns [`DelayError::ResourceExhausted`](crate::DelayError::ResourceExhausted)
    /// when the timer subsystem cannot allocate another timer.
    fn create(&self, waker: Arc<TaskNotify>) -> DelayResult<Self::Handle>;

    /// Arm the timer to fire once after `duration_us` microseconds.
    ///
    /// # Errors
    ///
    /// Returns [`DelayError::ArmFailed`](crate::DelayError::ArmFailed) when
    /// the timer is not in an armable state, e.g. already armed or torn down.
    fn start_once(&self, handle: &Self::Handle, duration_us: u64) -> DelayResult;

    /// Tear down the timer. Safe on idle and armed timers.
    fn delete(&self, handle: &Self::Handle);

    /// Blocking, non-yielding wait for `duration_us` microseconds.
    fn busy_wait_us(&self, duration_us: u64);

    /// Monotonic microsecond clock.
    fn now_us(&self) -> u64;
}
