//! Fluent registration on a single state.

use crate::builder::error::ConfigError;
use crate::builder::transition::TransitionBuilder;
use crate::core::{Action, State, Trigger};
use crate::effects::registry::StateRegistry;
use crate::effects::{StateConfiguration, Transition};

/// Registers transitions and callbacks on one state of a machine.
///
/// Obtained from `StateMachine::configure_state`. Every method that can
/// fail checks first and registers second, so an error leaves the machine
/// untouched.
pub struct StateConfigurator<'m, T, S: State, Tr, P> {
    states: &'m mut StateRegistry<T, S, Tr, P>,
    state: S,
}

impl<'m, T, S: State, Tr: Trigger, P> StateConfigurator<'m, T, S, Tr, P> {
    pub(crate) fn new(states: &'m mut StateRegistry<T, S, Tr, P>, state: S) -> Self {
        Self { states, state }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    fn config(&mut self) -> &mut StateConfiguration<T, S, Tr, P> {
        self.states.configure(self.state.clone())
    }

    /// Add a transition taken when `trigger` fires in this state.
    pub fn add_transition(&mut self, trigger: Tr, transition: Transition<T, S, P>) -> &mut Self {
        self.config().add_transition(trigger, transition);
        self
    }

    /// Action run whenever this state is consulted for `trigger`, before
    /// its transitions are evaluated.
    pub fn add_trigger_action(
        &mut self,
        trigger: Tr,
        action: Action<T, P>,
    ) -> Result<&mut Self, ConfigError> {
        self.config().add_trigger_action(trigger, action)?;
        Ok(self)
    }

    /// Action run on entering this state, from `previous` only when given.
    pub fn add_entry_action(
        &mut self,
        action: Action<T, P>,
        previous: Option<S>,
    ) -> Result<&mut Self, ConfigError> {
        self.config().add_entry_action(action, previous)?;
        Ok(self)
    }

    /// Action run on leaving this state, towards `next` only when given.
    pub fn add_exit_action(
        &mut self,
        action: Action<T, P>,
        next: Option<S>,
    ) -> Result<&mut Self, ConfigError> {
        self.config().add_exit_action(action, next)?;
        Ok(self)
    }

    /// Action run when a transition leaves the object in this same state.
    pub fn add_reentry_action(&mut self, action: Action<T, P>) -> Result<&mut Self, ConfigError> {
        self.config().add_reentry_action(action)?;
        Ok(self)
    }

    /// Transition attempted as soon as this state is entered.
    pub fn add_auto_forward_transition(
        &mut self,
        transition: Transition<T, S, P>,
        previous: Option<S>,
    ) -> Result<&mut Self, ConfigError> {
        self.config().add_auto_forward(transition, previous)?;
        Ok(self)
    }

    /// Transition attempted when a trigger matches nothing in this state.
    pub fn add_auto_fallback_transition(
        &mut self,
        transition: Transition<T, S, P>,
        previous: Option<S>,
    ) -> Result<&mut Self, ConfigError> {
        self.config().add_auto_fallback(transition, previous)?;
        Ok(self)
    }

    /// Inherit the transitions and callbacks of `superstate`.
    pub fn add_super_state(&mut self, superstate: S) -> Result<&mut Self, ConfigError> {
        self.states.add_super_state(&self.state, superstate)?;
        Ok(self)
    }
}

impl<'m, T: 'static, S: State, Tr: Trigger, P: 'static> StateConfigurator<'m, T, S, Tr, P> {
    /// Build and add a transition.
    pub fn transition(
        &mut self,
        trigger: Tr,
        builder: TransitionBuilder<T, S, P>,
    ) -> Result<&mut Self, ConfigError> {
        let transition = builder.build()?;
        Ok(self.add_transition(trigger, transition))
    }
}
