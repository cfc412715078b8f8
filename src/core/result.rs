//! Outcome of a firing.

use super::history::{StateHistory, StateTransition};
use super::state::State;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Result of firing a trigger, threaded between the steps of one firing.
///
/// - `starting_state` is the object's state when the outermost firing began
///   and never changes across cascades.
/// - `current_state` is the state on the object when this result was made.
/// - `previous_state` is the state the object held right before the most
///   recently applied step; scoped entry and auto-transition slots are
///   looked up by it.
///
/// A result with `transition_defined() == false` is the sentinel for "no
/// configuration exists for this state".
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "Tr: Serialize", deserialize = "Tr: Deserialize<'de>"))]
pub struct TransitionResult<S: State, Tr> {
    trigger: Tr,
    starting_state: S,
    current_state: S,
    previous_state: S,
    last_transition_name: String,
    condition_met: bool,
    was_successful: bool,
    was_cancelled: bool,
    transition_defined: bool,
    history: StateHistory<S>,
}

impl<S: State, Tr> TransitionResult<S, Tr> {
    /// Sentinel returned when the object's state has no configuration.
    pub fn undefined(trigger: Tr, state: S) -> Self {
        Self {
            transition_defined: false,
            ..Self::unchanged(trigger, state)
        }
    }

    /// Unsuccessful result in which nothing has happened yet.
    pub fn unchanged(trigger: Tr, state: S) -> Self {
        Self {
            trigger,
            starting_state: state.clone(),
            current_state: state.clone(),
            previous_state: state,
            last_transition_name: String::new(),
            condition_met: false,
            was_successful: false,
            was_cancelled: false,
            transition_defined: true,
            history: StateHistory::new(),
        }
    }

    /// Successful result describing one already applied step.
    ///
    /// Useful when driving a state configuration from a known position, for
    /// example in tests of automatic transitions.
    pub fn applied(
        trigger: Tr,
        starting_state: S,
        previous_state: S,
        current_state: S,
        transition: impl Into<String>,
    ) -> Self {
        let transition = transition.into();
        let history = StateHistory::new().record(StateTransition {
            from: previous_state.clone(),
            to: current_state.clone(),
            transition: transition.clone(),
            timestamp: Utc::now(),
        });
        Self {
            trigger,
            starting_state,
            current_state,
            previous_state,
            last_transition_name: transition,
            condition_met: true,
            was_successful: true,
            was_cancelled: false,
            transition_defined: true,
            history,
        }
    }

    /// Derive the result of a step that did not apply.
    ///
    /// State bookkeeping and history carry over unchanged.
    pub(crate) fn declined(&self, cancelled: bool) -> Self
    where
        Tr: Clone,
    {
        Self {
            was_successful: false,
            was_cancelled: cancelled,
            ..self.clone()
        }
    }

    /// Derive the result of a step that moved the object from `previous` to
    /// `current`.
    pub(crate) fn advanced(&self, previous: S, current: S, transition: &str) -> Self
    where
        Tr: Clone,
    {
        let history = self.history.record(StateTransition {
            from: previous.clone(),
            to: current.clone(),
            transition: transition.to_string(),
            timestamp: Utc::now(),
        });
        Self {
            trigger: self.trigger.clone(),
            starting_state: self.starting_state.clone(),
            current_state: current,
            previous_state: previous,
            last_transition_name: transition.to_string(),
            condition_met: true,
            was_successful: true,
            was_cancelled: false,
            transition_defined: true,
            history,
        }
    }

    pub fn trigger(&self) -> &Tr {
        &self.trigger
    }

    pub fn starting_state(&self) -> &S {
        &self.starting_state
    }

    pub fn current_state(&self) -> &S {
        &self.current_state
    }

    pub fn previous_state(&self) -> &S {
        &self.previous_state
    }

    pub fn last_transition_name(&self) -> &str {
        &self.last_transition_name
    }

    /// Whether any guard within this firing was satisfied.
    pub fn condition_met(&self) -> bool {
        self.condition_met
    }

    /// Whether the last step of the firing applied.
    ///
    /// A successful step normally leaves `current_state() !=
    /// previous_state()`. A self transition is the exception: it succeeds
    /// with both equal and runs the state's re-entry action instead of exit
    /// and entry actions.
    pub fn was_successful(&self) -> bool {
        self.was_successful
    }

    pub fn was_cancelled(&self) -> bool {
        self.was_cancelled
    }

    pub fn transition_defined(&self) -> bool {
        self.transition_defined
    }

    /// Every step applied during the firing, in order.
    pub fn history(&self) -> &StateHistory<S> {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_enum;

    state_enum! {
        enum SaleState {
            Open,
            ChangeDue,
            Complete,
        }
    }

    #[test]
    fn undefined_sentinel_keeps_observed_state() {
        let result = TransitionResult::undefined("pay", SaleState::Open);

        assert!(!result.transition_defined());
        assert!(!result.was_successful());
        assert_eq!(result.starting_state(), &SaleState::Open);
        assert_eq!(result.current_state(), &SaleState::Open);
        assert_eq!(result.previous_state(), &SaleState::Open);
    }

    #[test]
    fn advanced_keeps_starting_state_and_extends_history() {
        let first =
            TransitionResult::applied("pay", SaleState::Open, SaleState::Open, SaleState::ChangeDue, "pay");
        let second = first.advanced(SaleState::ChangeDue, SaleState::Complete, "auto_complete");

        assert!(second.was_successful());
        assert_eq!(second.starting_state(), &SaleState::Open);
        assert_eq!(second.previous_state(), &SaleState::ChangeDue);
        assert_eq!(second.current_state(), &SaleState::Complete);
        assert_eq!(second.last_transition_name(), "auto_complete");
        assert_eq!(
            second.history().get_path(),
            vec![&SaleState::Open, &SaleState::ChangeDue, &SaleState::Complete]
        );
    }

    #[test]
    fn declined_carries_bookkeeping() {
        let applied =
            TransitionResult::applied("pay", SaleState::Open, SaleState::Open, SaleState::ChangeDue, "pay");
        let declined = applied.declined(true);

        assert!(!declined.was_successful());
        assert!(declined.was_cancelled());
        assert!(declined.condition_met());
        assert_eq!(declined.current_state(), &SaleState::ChangeDue);
        assert_eq!(declined.previous_state(), &SaleState::Open);
        assert_eq!(declined.last_transition_name(), "pay");
    }

    #[test]
    fn result_serializes_correctly() {
        let result =
            TransitionResult::applied("pay".to_string(), SaleState::Open, SaleState::Open, SaleState::Complete, "pay");

        let json = serde_json::to_string(&result).unwrap();
        let deserialized: TransitionResult<SaleState, String> = serde_json::from_str(&json).unwrap();

        assert_eq!(result, deserialized);
    }
}
