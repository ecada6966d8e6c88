//! Error types for the delay engine.

use thiserror::Error;

/// Failures surfaced by delay operations.
///
/// Both variants are detected synchronously at the call that triggers them;
/// a failed call has neither blocked the task nor performed a partial delay.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DelayError {
    /// One-shot timer creation failed, typically out of timer resources.
    #[error("timer creation failed: {0}")]
    ResourceExhausted(String),

    /// Arming the one-shot timer was rejected by the timer subsystem.
    #[error("timer arm failed: {0}")]
    ArmFailed(String),
}

/// Result alias for delay operations.
pub type DelayResult<T = ()> = Result<T, DelayError>;
