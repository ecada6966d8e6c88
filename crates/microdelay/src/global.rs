//! Process-wide delay engine over the system timer binding.
//!
//! Mirrors the engine API as free functions for callers that do not want to
//! thread an engine handle through their code. The engine is created on first
//! use and lives for the rest of the process.

use std::sync::OnceLock;

use crate::engine::DelayEngine;
use crate::error::DelayResult;
use crate::system::SystemTimer;

static ENGINE: OnceLock<DelayEngine<SystemTimer>> = OnceLock::new();

fn engine() -> &'static DelayEngine<SystemTimer> {
    ENGINE.get_or_init(|| DelayEngine::new(SystemTimer::new()))
}

/// Block the calling task for approximately `duration_us` microseconds.
///
/// See [`DelayEngine::delay`].
///
/// # Errors
///
/// Propagates timer creation and arm failures; on error the task has not
/// blocked.
pub fn delay(duration_us: u64) -> DelayResult {
    engine().delay(duration_us)
}

/// Measure the wake overhead and publish it as the process-wide compensation
/// value.
///
/// See [`DelayEngine::calibrate`]. Run once under representative load before
/// steady-state use.
///
/// # Errors
///
/// Propagates any failure of the underlying delay calls.
pub fn calibrate() -> DelayResult<u64> {
    engine().calibrate()
}

/// Current process-wide compensation value in microseconds.
#[must_use]
pub fn compensation_us() -> u64 {
    engine().compensation_us()
}

/// Restore a previously measured compensation value without re-calibrating.
pub fn set_compensation_us(compensation_us: u64) {
    engine().set_compensation_us(compensation_us);
}

/// Drop the calling task's timer resource, if it has one.
///
/// Call from a task that is about to exit and has used [`delay`]; otherwise
/// its timer lives until process exit.
pub fn release_current_task() {
    engine().release_current_task();
}
