//! History of the steps applied during a firing.
//!
//! Every applied transition, whether fired by a trigger or by an automatic
//! cascade, appends one record. Histories are immutable values: `record`
//! returns a new history.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single applied transition.
///
/// # Example
///
/// ```rust
/// use stateline::core::StateTransition;
/// use stateline::state_enum;
/// use chrono::Utc;
///
/// state_enum! {
///     enum TaskState {
///         Pending,
///         Running,
///     }
/// }
///
/// let step = StateTransition {
///     from: TaskState::Pending,
///     to: TaskState::Running,
///     transition: "start".to_string(),
///     timestamp: Utc::now(),
/// };
/// assert_eq!(step.transition, "start");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State> {
    /// The state the object held before the step
    pub from: S,
    /// The state the object holds after the step
    pub to: S,
    /// Display name of the transition that applied
    pub transition: String,
    /// When the mutation was applied
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of applied transitions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State> {
    transitions: Vec<StateTransition<S>>,
}

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateHistory<S> {
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a transition, returning a new history.
    ///
    /// # Example
    ///
    /// ```rust
    /// use stateline::core::{StateHistory, StateTransition};
    /// use stateline::state_enum;
    /// use chrono::Utc;
    ///
    /// state_enum! {
    ///     enum Step { A, B }
    /// }
    ///
    /// let history = StateHistory::new();
    /// let new_history = history.record(StateTransition {
    ///     from: Step::A,
    ///     to: Step::B,
    ///     transition: "advance".to_string(),
    ///     timestamp: Utc::now(),
    /// });
    ///
    /// assert_eq!(new_history.len(), 1);
    /// assert!(history.is_empty()); // Original unchanged
    /// ```
    pub fn record(&self, transition: StateTransition<S>) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    /// Get the path of states traversed.
    ///
    /// Returns the `from` state of the first step followed by the `to` state
    /// of every step.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Time between the first and last recorded step, `None` when empty.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    pub fn transitions(&self) -> &[StateTransition<S>] {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
