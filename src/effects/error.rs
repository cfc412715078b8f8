//! Errors raised while firing a trigger.

use crate::core::BoxError;
use thiserror::Error;

/// Failures that abort a firing.
///
/// Unmatched triggers, declined guards and cancellation are not errors; they
/// are reported through the flags on `TransitionResult`.
#[derive(Debug, Error)]
pub enum FireError {
    /// A guard, selector or callback failed. The object keeps whatever state
    /// the last applied step gave it.
    #[error(transparent)]
    Callback(BoxError),

    #[error("Automatic transitions exceeded the cascade limit of {limit} steps in state '{state}'")]
    CascadeLimitExceeded { limit: usize, state: String },
}
