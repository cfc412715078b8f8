//! Builder API for ergonomic state machine construction.
//!
//! This module provides fluent builders and macros for creating state machines
//! with minimal boilerplate. Every fallible registration returns
//! [`ConfigError`] and leaves the machine unchanged on failure.

pub mod error;
pub mod machine;
pub mod macros;
pub mod state;
pub mod transition;

pub use error::ConfigError;
pub use machine::StateMachineBuilder;
pub use state::StateConfigurator;
pub use transition::TransitionBuilder;

use crate::core::{Guard, State};
use crate::effects::{Target, Transition};

/// Create an unconditional transition to `to`, named after it.
///
/// # Example
///
/// ```
/// use stateline::builder::simple_transition;
/// use stateline::effects::Transition;
/// use stateline::state_enum;
///
/// state_enum! {
///     enum MyState {
///         Start,
///         End,
///     }
/// }
///
/// struct Job;
///
/// let transition: Transition<Job, MyState> = simple_transition(MyState::End);
/// assert_eq!(transition.name(), "End");
/// ```
pub fn simple_transition<T, S: State, P>(to: S) -> Transition<T, S, P> {
    Transition {
        name: to.name().to_string(),
        target: Target::State(to),
        guard: None,
        priority: 0,
    }
}

/// Create a transition to `to` guarded by a synchronous predicate.
///
/// # Example
///
/// ```
/// use stateline::builder::guarded_transition;
/// use stateline::effects::Transition;
/// use stateline::state_enum;
///
/// state_enum! {
///     enum MyState {
///         Start,
///         Middle,
///     }
/// }
///
/// struct Job {
///     ready: bool,
/// }
///
/// let transition: Transition<Job, MyState> =
///     guarded_transition(MyState::Middle, |job: &Job| job.ready);
/// assert!(transition.is_guarded());
/// ```
pub fn guarded_transition<T, S, P, F>(to: S, guard: F) -> Transition<T, S, P>
where
    T: 'static,
    S: State,
    P: 'static,
    F: Fn(&T) -> bool + Send + Sync + 'static,
{
    Transition {
        guard: Some(Guard::new(move |object: &T, _| {
            let passed = guard(object);
            Box::pin(async move { Ok(passed) })
        })),
        ..simple_transition(to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_enum;
    use tokio_util::sync::CancellationToken;

    state_enum! {
        enum TestState {
            Middle,
        }
    }

    struct Job {
        ready: bool,
    }

    #[test]
    fn simple_transition_builds() {
        let transition: Transition<Job, TestState> = simple_transition(TestState::Middle);

        assert_eq!(transition.destination(), Some(&TestState::Middle));
        assert_eq!(transition.priority(), 0);
        assert!(!transition.is_guarded());
    }

    #[tokio::test]
    async fn guarded_transition_respects_guard() {
        let transition: Transition<Job, TestState> =
            guarded_transition(TestState::Middle, |job: &Job| job.ready);
        let guard = transition.guard.as_ref().unwrap();
        let cancel = CancellationToken::new();

        assert!(guard
            .check(&Job { ready: true }, None, &cancel)
            .await
            .unwrap());
        assert!(!guard
            .check(&Job { ready: false }, None, &cancel)
            .await
            .unwrap());
    }
}
