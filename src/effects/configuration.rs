//! Per-state behaviour and the trigger resolution algorithm.

use crate::builder::ConfigError;
use crate::core::{Action, ExecutionContext, State, StateAccess, Trigger, TransitionResult};
use crate::effects::error::FireError;
use crate::effects::listeners::TransitionListeners;
use crate::effects::registry::StateRegistry;
use crate::effects::transition::Transition;
use std::collections::{BTreeMap, HashMap};
use tracing::trace;

/// Borrowed view of a machine handed to each resolution step.
pub(crate) struct Resolver<'m, T, S: State, Tr, P> {
    pub(crate) states: &'m StateRegistry<T, S, Tr, P>,
    pub(crate) access: &'m StateAccess<T, S>,
    pub(crate) listeners: &'m TransitionListeners<T, S, Tr>,
}

/// One unscoped value plus at most one value per adjacent state.
struct ScopedSlot<S, V> {
    unscoped: Option<V>,
    scoped: BTreeMap<S, V>,
}

impl<S: Ord, V> ScopedSlot<S, V> {
    fn new() -> Self {
        Self {
            unscoped: None,
            scoped: BTreeMap::new(),
        }
    }

    fn is_taken(&self, scope: Option<&S>) -> bool {
        match scope {
            Some(state) => self.scoped.contains_key(state),
            None => self.unscoped.is_some(),
        }
    }

    fn insert(&mut self, scope: Option<S>, value: V) {
        match scope {
            Some(state) => {
                self.scoped.insert(state, value);
            }
            None => self.unscoped = Some(value),
        }
    }

    /// The value scoped to `adjacent`, else the unscoped value.
    fn resolve(&self, adjacent: &S) -> Option<&V> {
        self.scoped.get(adjacent).or(self.unscoped.as_ref())
    }
}

/// Behaviour registered for one state.
pub struct StateConfiguration<T, S: State, Tr, P> {
    state: S,
    transitions: HashMap<Tr, Vec<Transition<T, S, P>>>,
    trigger_actions: HashMap<Tr, Action<T, P>>,
    entry_actions: ScopedSlot<S, Action<T, P>>,
    exit_actions: ScopedSlot<S, Action<T, P>>,
    reentry_action: Option<Action<T, P>>,
    auto_forward: ScopedSlot<S, Transition<T, S, P>>,
    auto_fallback: ScopedSlot<S, Transition<T, S, P>>,
    super_states: Vec<S>,
}

fn scope_name<S: State>(scope: &Option<S>) -> Option<String> {
    scope.as_ref().map(|state| state.name().to_string())
}

impl<T, S: State, Tr: Trigger, P> StateConfiguration<T, S, Tr, P> {
    pub(crate) fn new(state: S) -> Self {
        Self {
            state,
            transitions: HashMap::new(),
            trigger_actions: HashMap::new(),
            entry_actions: ScopedSlot::new(),
            exit_actions: ScopedSlot::new(),
            reentry_action: None,
            auto_forward: ScopedSlot::new(),
            auto_fallback: ScopedSlot::new(),
            super_states: Vec::new(),
        }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn super_states(&self) -> &[S] {
        &self.super_states
    }

    /// Transitions registered for `trigger`, in evaluation order.
    pub fn transitions_for(&self, trigger: &Tr) -> &[Transition<T, S, P>] {
        self.transitions.get(trigger).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn push_super_state(&mut self, superstate: S) {
        self.super_states.push(superstate);
    }

    /// Insert after every transition of equal or higher priority.
    pub(crate) fn add_transition(&mut self, trigger: Tr, transition: Transition<T, S, P>) {
        let candidates = self.transitions.entry(trigger).or_default();
        let position = candidates.partition_point(|t| t.priority >= transition.priority);
        candidates.insert(position, transition);
    }

    pub(crate) fn add_trigger_action(
        &mut self,
        trigger: Tr,
        action: Action<T, P>,
    ) -> Result<(), ConfigError> {
        if self.trigger_actions.contains_key(&trigger) {
            return Err(ConfigError::DuplicateStateTriggerAction {
                state: self.state.name().to_string(),
                trigger: format!("{trigger:?}"),
            });
        }
        self.trigger_actions.insert(trigger, action);
        Ok(())
    }

    pub(crate) fn add_entry_action(
        &mut self,
        action: Action<T, P>,
        previous: Option<S>,
    ) -> Result<(), ConfigError> {
        if self.entry_actions.is_taken(previous.as_ref()) {
            return Err(ConfigError::DuplicateEntryAction {
                state: self.state.name().to_string(),
                previous: scope_name(&previous),
            });
        }
        self.entry_actions.insert(previous, action);
        Ok(())
    }

    pub(crate) fn add_exit_action(
        &mut self,
        action: Action<T, P>,
        next: Option<S>,
    ) -> Result<(), ConfigError> {
        if self.exit_actions.is_taken(next.as_ref()) {
            return Err(ConfigError::DuplicateExitAction {
                state: self.state.name().to_string(),
                next: scope_name(&next),
            });
        }
        self.exit_actions.insert(next, action);
        Ok(())
    }

    pub(crate) fn add_reentry_action(&mut self, action: Action<T, P>) -> Result<(), ConfigError> {
        if self.reentry_action.is_some() {
            return Err(ConfigError::DuplicateReentryAction {
                state: self.state.name().to_string(),
            });
        }
        self.reentry_action = Some(action);
        Ok(())
    }

    pub(crate) fn add_auto_forward(
        &mut self,
        transition: Transition<T, S, P>,
        previous: Option<S>,
    ) -> Result<(), ConfigError> {
        if self.auto_forward.is_taken(previous.as_ref()) {
            return Err(ConfigError::DuplicateAutoForward {
                state: self.state.name().to_string(),
                previous: scope_name(&previous),
            });
        }
        self.auto_forward.insert(previous, transition);
        Ok(())
    }

    pub(crate) fn add_auto_fallback(
        &mut self,
        transition: Transition<T, S, P>,
        previous: Option<S>,
    ) -> Result<(), ConfigError> {
        if self.auto_fallback.is_taken(previous.as_ref()) {
            return Err(ConfigError::DuplicateAutoFallback {
                state: self.state.name().to_string(),
                previous: scope_name(&previous),
            });
        }
        self.auto_fallback.insert(previous, transition);
        Ok(())
    }

    /// Resolve the context's trigger against this state and, failing that,
    /// its superstates.
    ///
    /// Each level runs its trigger action, then its transitions in priority
    /// order, then its automatic fallback. The first level that applies a
    /// transition (or observes cancellation) wins; otherwise the last
    /// unsuccessful result is returned. `prior` is handed unchanged to every
    /// level so the starting state survives delegation.
    pub(crate) async fn fire_trigger(
        &self,
        resolver: &Resolver<'_, T, S, Tr, P>,
        object: &mut T,
        context: &ExecutionContext<'_, Tr, P>,
        prior: &TransitionResult<S, Tr>,
    ) -> Result<TransitionResult<S, Tr>, FireError> {
        let mut outcome = prior.declined(false);
        for config in resolver.states.lineage(self) {
            outcome = config.fire_own(resolver, object, context, prior).await?;
            if outcome.was_successful() || outcome.was_cancelled() {
                break;
            }
        }
        Ok(outcome)
    }

    async fn fire_own(
        &self,
        resolver: &Resolver<'_, T, S, Tr, P>,
        object: &mut T,
        context: &ExecutionContext<'_, Tr, P>,
        prior: &TransitionResult<S, Tr>,
    ) -> Result<TransitionResult<S, Tr>, FireError> {
        if let Some(action) = self.trigger_actions.get(context.trigger()) {
            action
                .execute(object, context.request(), context.cancellation())
                .await
                .map_err(FireError::Callback)?;
        }

        let mut outcome = prior.declined(context.is_cancelled());
        for transition in self.transitions_for(context.trigger()) {
            outcome = transition
                .evaluate(resolver.access, resolver.listeners, object, context, Some(prior))
                .await?;
            if outcome.was_successful() || outcome.was_cancelled() {
                return Ok(outcome);
            }
        }

        if let Some(fallback) = self.auto_fallback.resolve(prior.previous_state()) {
            trace!(state = self.state.name(), "trying automatic fallback");
            outcome = fallback
                .evaluate(resolver.access, resolver.listeners, object, context, Some(prior))
                .await?;
        }
        Ok(outcome)
    }

    /// Run the entry action scoped to the state the object came from, else
    /// the unscoped one.
    pub(crate) async fn execute_entry_action(
        &self,
        object: &mut T,
        context: &ExecutionContext<'_, Tr, P>,
        result: &TransitionResult<S, Tr>,
    ) -> Result<(), FireError> {
        if let Some(action) = self.entry_actions.resolve(result.previous_state()) {
            let ran = action
                .execute(object, context.request(), context.cancellation())
                .await
                .map_err(FireError::Callback)?;
            trace!(state = self.state.name(), ran, "entry action");
        }
        Ok(())
    }

    /// Run the exit action scoped to the state the object moved to, else
    /// the unscoped one.
    pub(crate) async fn execute_exit_action(
        &self,
        object: &mut T,
        context: &ExecutionContext<'_, Tr, P>,
        result: &TransitionResult<S, Tr>,
    ) -> Result<(), FireError> {
        if let Some(action) = self.exit_actions.resolve(result.current_state()) {
            let ran = action
                .execute(object, context.request(), context.cancellation())
                .await
                .map_err(FireError::Callback)?;
            trace!(state = self.state.name(), ran, "exit action");
        }
        Ok(())
    }

    /// Run the first re-entry action found on this state or its
    /// superstates. Returns whether one was found.
    pub(crate) async fn execute_reentry_action(
        &self,
        resolver: &Resolver<'_, T, S, Tr, P>,
        object: &mut T,
        context: &ExecutionContext<'_, Tr, P>,
    ) -> Result<bool, FireError> {
        for config in resolver.states.lineage(self) {
            if let Some(action) = &config.reentry_action {
                action
                    .execute(object, context.request(), context.cancellation())
                    .await
                    .map_err(FireError::Callback)?;
                trace!(state = config.state.name(), "reentry action");
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Attempt the automatic forward transition registered closest to this
    /// state: its own, or else the first one found through its superstates.
    ///
    /// Only that one transition is evaluated. `admit` sees the destination
    /// before the object is touched and may hold the step back. `None` means
    /// no automatic transition applied and none was cancelled: `prior`
    /// stands and the cascade ends.
    pub(crate) async fn execute_auto_transition<F>(
        &self,
        resolver: &Resolver<'_, T, S, Tr, P>,
        object: &mut T,
        context: &ExecutionContext<'_, Tr, P>,
        prior: &TransitionResult<S, Tr>,
        admit: F,
    ) -> Result<Option<TransitionResult<S, Tr>>, FireError>
    where
        F: FnOnce(&S) -> Result<bool, FireError>,
    {
        let Some(transition) = self.auto_transition(resolver.states, prior.previous_state()) else {
            return Ok(None);
        };
        match transition.destination_for(object, context).await? {
            Some(destination) => {
                if !admit(&destination)? {
                    return Ok(None);
                }
                Ok(Some(transition.apply(
                    resolver.access,
                    resolver.listeners,
                    object,
                    prior,
                    destination,
                )))
            }
            None if context.is_cancelled() => Ok(Some(prior.declined(true))),
            None => Ok(None),
        }
    }

    fn auto_transition<'s>(
        &'s self,
        states: &'s StateRegistry<T, S, Tr, P>,
        previous: &S,
    ) -> Option<&'s Transition<T, S, P>> {
        states
            .lineage(self)
            .into_iter()
            .find_map(|config| config.auto_forward.resolve(previous))
    }

    /// True for this state and every transitive superstate.
    pub(crate) fn is_in_state(&self, states: &StateRegistry<T, S, Tr, P>, candidate: &S) -> bool {
        states
            .lineage(self)
            .iter()
            .any(|config| config.state == *candidate)
    }
}
