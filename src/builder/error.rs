//! Registration errors for state machines, states and transitions.

use thiserror::Error;

/// Errors raised while configuring a state machine.
///
/// A registration that fails leaves the machine exactly as it was.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("State accessor not specified. Call .accessor(fn) before .build()")]
    MissingAccessor,

    #[error("State mutator not specified. Call .mutator(fn) before .build()")]
    MissingMutator,

    #[error("Transition destination not specified. Call .to(state) or .select(selector)")]
    MissingTarget,

    #[error("Only one action is allowed for trigger {trigger}")]
    DuplicateTriggerAction { trigger: String },

    #[error("State '{state}' already has an action for trigger {trigger}")]
    DuplicateStateTriggerAction { state: String, trigger: String },

    #[error("State '{state}' already has an entry action{}", scope_suffix("from", .previous))]
    DuplicateEntryAction {
        state: String,
        previous: Option<String>,
    },

    #[error("State '{state}' already has an exit action{}", scope_suffix("to", .next))]
    DuplicateExitAction { state: String, next: Option<String> },

    #[error("State '{state}' already has a reentry action")]
    DuplicateReentryAction { state: String },

    #[error("State '{state}' already has an automatic forward transition{}", scope_suffix("from", .previous))]
    DuplicateAutoForward {
        state: String,
        previous: Option<String>,
    },

    #[error("State '{state}' already has an automatic fallback transition{}", scope_suffix("from", .previous))]
    DuplicateAutoFallback {
        state: String,
        previous: Option<String>,
    },

    #[error("State '{state}' cannot be its own superstate")]
    SelfSuperState { state: String },

    #[error("State '{superstate}' is already a superstate of '{state}'")]
    DuplicateSuperState { state: String, superstate: String },

    #[error("Making '{superstate}' a superstate of '{state}' would create a cycle")]
    SuperStateCycle { state: String, superstate: String },

    #[error("Invalid machine options: {0}")]
    InvalidOptions(String),
}

fn scope_suffix(preposition: &str, scope: &Option<String>) -> String {
    scope
        .as_ref()
        .map(|state| format!(" {preposition} '{state}'"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoped_messages_name_the_adjacent_state() {
        let err = ConfigError::DuplicateEntryAction {
            state: "ChangeDue".to_string(),
            previous: Some("Open".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "State 'ChangeDue' already has an entry action from 'Open'"
        );
    }

    #[test]
    fn unscoped_messages_have_no_suffix() {
        let err = ConfigError::DuplicateExitAction {
            state: "Open".to_string(),
            next: None,
        };
        assert_eq!(err.to_string(), "State 'Open' already has an exit action");
    }
}
