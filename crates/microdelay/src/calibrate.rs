//! Compensation calibration for the delay engine.
//!
//! The arm → expiry → notify → resume path has a measurable latency. The
//! calibrator exercises the engine at a fixed short duration, averages the
//! observed overshoot and publishes it as the compensation value that every
//! subsequent delay (from any task) subtracts from its programmed timer
//! duration.

use tracing::debug;

use crate::backend::TimerBackend;
use crate::engine::DelayEngine;
use crate::error::DelayResult;

/// Number of measured trials per calibration run.
pub const CALIBRATION_TRIALS: u64 = 10;

/// Requested duration of each calibration trial, in microseconds.
pub const CALIBRATION_TRIAL_US: u64 = 100;

impl<B: TimerBackend> DelayEngine<B> {
    /// Measure the wake overhead and publish it as the compensation value.
    ///
    /// Runs [`CALIBRATION_TRIALS`] delays of [`CALIBRATION_TRIAL_US`]
    /// microseconds each, preceded by one zero-duration call so the timer
    /// already exists before measurement starts. The mean overshoot
    /// (truncating integer division, clamped at zero) becomes the new
    /// compensation value and is returned.
    ///
    /// Calibrate under conditions representative of the actual workload: an
    /// idle system understates the overhead seen once other tasks contend for
    /// timer and interrupt resources. Concurrent calibration runs are not
    /// synchronized; the last writer wins.
    ///
    /// # Errors
    ///
    /// Propagates any [`delay`](Self::delay) failure; the compensation value
    /// is left untouched in that case.
    pub fn calibrate(&self) -> DelayResult<u64> {
        self.delay(0)?;

        let mut overshoot_total: i64 = 0;
        for _ in 0..CALIBRATION_TRIALS {
            let start = self.backend.now_us();
            self.delay(CALIBRATION_TRIAL_US)?;
            let elapsed = self.backend.now_us().saturating_sub(start);
            overshoot_total += elapsed as i64 - CALIBRATION_TRIAL_US as i64;
        }

        let mean = overshoot_total / CALIBRATION_TRIALS as i64;
        let compensation = u64::try_from(mean).unwrap_or(0);
        self.set_compensation_us(compensation);
        debug!(
            compensation_us = compensation,
            trials = CALIBRATION_TRIALS,
            "delay calibration complete"
        );
        Ok(compensation)
    }
}
