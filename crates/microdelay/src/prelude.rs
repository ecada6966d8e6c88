//! Prelude module for common delay types.
//!
//! This module provides a convenient way to import the most commonly used
//! types from the crate.

pub use crate::backend::TimerBackend;
pub use crate::engine::DelayEngine;
pub use crate::error::{DelayError, DelayResult};
pub use crate::notify::TaskNotify;
pub use crate::{CALIBRATION_TRIALS, CALIBRATION_TRIAL_US};

#[cfg(feature = "system-timer")]
pub use crate::system::SystemTimer;
