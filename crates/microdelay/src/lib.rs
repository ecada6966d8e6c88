//! Calibrated sub-millisecond task delays for coarse-tick schedulers.
//!
//! Scheduler ticks are typically 1ms or worse, which makes tick-based blocking
//! delays useless for fine-grained timing. This crate replaces them with a
//! hybrid mechanism:
//!
//! - **[`DelayEngine`]**: Per-task one-shot timer ownership and the
//!   busy-wait/blocking dispatch policy
//! - **Calibration**: Measures the timer-arm-to-wake overhead and subtracts it
//!   from every programmed timer duration
//! - **[`TaskNotify`]**: One-slot wake notification signalled from the timer
//!   expiry context
//! - **[`SystemTimer`]**: Hosted binding of the one-shot timer subsystem with
//!   platform-specific precision sleep
//!
//! # RT-Safety Guarantees
//!
//! - **No heap allocations** on the delay hot path after a task's first call
//! - **No locking** in the expiry callback path
//! - Delays at or below the measured overhead busy-wait instead of arming a
//!   timer
//!
//! # Example
//!
//! ```no_run
//! fn main() -> microdelay::DelayResult {
//!     // Run once under representative load; the value feeds every later delay.
//!     let overhead_us = microdelay::calibrate()?;
//!     println!("measured wake overhead: {overhead_us}us");
//!
//!     microdelay::delay(250)?;
//!     Ok(())
//! }
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]
#![deny(static_mut_refs)]
#![deny(unused_must_use)]

pub mod backend;
pub mod calibrate;
pub mod engine;
pub mod error;
pub mod notify;

#[cfg(feature = "system-timer")]
pub mod system;

#[cfg(feature = "system-timer")]
mod global;

#[cfg(all(feature = "system-timer", target_os = "linux"))]
mod linux;

#[cfg(all(feature = "system-timer", not(target_os = "linux")))]
mod fallback;

pub mod prelude;

#[cfg(test)]
mod test_util;

pub use backend::TimerBackend;
pub use calibrate::{CALIBRATION_TRIALS, CALIBRATION_TRIAL_US};
pub use engine::DelayEngine;
pub use error::{DelayError, DelayResult};
pub use notify::TaskNotify;

#[cfg(feature = "system-timer")]
pub use global::{calibrate, compensation_us, delay, release_current_task, set_compensation_us};
#[cfg(feature = "system-timer")]
pub use system::SystemTimer;
