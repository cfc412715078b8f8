//! State machine that fires triggers against caller-owned objects.

use crate::builder::{ConfigError, StateConfigurator};
use crate::core::{Action, ExecutionContext, State, StateAccess, Trigger, TransitionResult};
use crate::effects::configuration::{Resolver, StateConfiguration};
use crate::effects::error::FireError;
use crate::effects::listeners::{ListenerId, TransitionListeners};
use crate::effects::registry::StateRegistry;
use crate::options::{CascadeLimitStrategy, MachineOptions};
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

/// Hierarchical state machine for objects of type `T`.
///
/// The machine owns no object state. Each firing borrows the object
/// mutably, reads its state through the accessor and writes it through the
/// mutator. Configuration happens up front through [`configure_state`] and
/// [`add_trigger_action`]; firing only needs `&self`, so one machine can
/// serve any number of objects.
///
/// [`configure_state`]: StateMachine::configure_state
/// [`add_trigger_action`]: StateMachine::add_trigger_action
pub struct StateMachine<T, S: State, Tr: Trigger, P = ()> {
    access: StateAccess<T, S>,
    states: StateRegistry<T, S, Tr, P>,
    trigger_actions: HashMap<Tr, Action<T, P>>,
    listeners: TransitionListeners<T, S, Tr>,
    options: MachineOptions,
}

impl<T, S: State, Tr: Trigger, P> StateMachine<T, S, Tr, P> {
    /// Create a machine with default options.
    pub fn new<A, M>(accessor: A, mutator: M) -> Self
    where
        A: Fn(&T) -> S + Send + Sync + 'static,
        M: Fn(&mut T, S) + Send + Sync + 'static,
    {
        Self::from_access(StateAccess::new(accessor, mutator))
    }

    pub(crate) fn from_access(access: StateAccess<T, S>) -> Self {
        Self {
            access,
            states: StateRegistry::new(),
            trigger_actions: HashMap::new(),
            listeners: TransitionListeners::new(),
            options: MachineOptions::default(),
        }
    }

    pub fn with_options(mut self, options: MachineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &MachineOptions {
        &self.options
    }

    /// Register the action run before resolution whenever `trigger` fires,
    /// whatever state the object is in.
    pub fn add_trigger_action(
        &mut self,
        trigger: Tr,
        action: Action<T, P>,
    ) -> Result<&mut Self, ConfigError> {
        if self.trigger_actions.contains_key(&trigger) {
            return Err(ConfigError::DuplicateTriggerAction {
                trigger: format!("{trigger:?}"),
            });
        }
        self.trigger_actions.insert(trigger, action);
        Ok(self)
    }

    /// Start (or continue) configuring `state`.
    ///
    /// The state counts as configured from this call on, even if nothing is
    /// registered on it.
    pub fn configure_state(&mut self, state: S) -> StateConfigurator<'_, T, S, Tr, P> {
        self.states.configure(state.clone());
        StateConfigurator::new(&mut self.states, state)
    }

    pub fn is_configured(&self, state: &S) -> bool {
        self.configuration(state).is_some()
    }

    pub fn configuration(&self, state: &S) -> Option<&StateConfiguration<T, S, Tr, P>> {
        self.states.get(state)
    }

    /// Listen for every transition this machine applies.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&T, &TransitionResult<S, Tr>) + Send + Sync + 'static,
    {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Current state of `object`, read through the accessor.
    pub fn state_of(&self, object: &T) -> S {
        self.access.get(object)
    }

    /// Whether `object` is in `state` or in a substate of it.
    pub fn is_in_state(&self, object: &T, state: &S) -> bool {
        let current = self.access.get(object);
        if current == *state {
            return true;
        }
        self.states
            .get(&current)
            .is_some_and(|config| config.is_in_state(&self.states, state))
    }

    /// Fire `trigger` without a request payload.
    ///
    /// If the cancellation signal stops an automatic transition after an
    /// earlier step already moved the object, the result is cancelled and
    /// unsuccessful even though the object is not in its starting state.
    /// `current_state()` and `history()` show how far the firing got.
    pub async fn fire_trigger(
        &self,
        object: &mut T,
        trigger: Tr,
        cancel: &CancellationToken,
    ) -> Result<TransitionResult<S, Tr>, FireError> {
        let context = ExecutionContext::new(trigger, cancel.clone());
        self.fire(object, &context).await
    }

    /// Fire `trigger` with a request payload for request-aware guards and
    /// actions.
    pub async fn fire_trigger_with(
        &self,
        object: &mut T,
        trigger: Tr,
        request: &P,
        cancel: &CancellationToken,
    ) -> Result<TransitionResult<S, Tr>, FireError> {
        let context = ExecutionContext::new(trigger, cancel.clone()).with_request(request);
        self.fire(object, &context).await
    }

    async fn fire(
        &self,
        object: &mut T,
        context: &ExecutionContext<'_, Tr, P>,
    ) -> Result<TransitionResult<S, Tr>, FireError> {
        let starting = self.access.get(object);
        debug!(trigger = ?context.trigger(), state = starting.name(), "firing trigger");

        if let Some(action) = self.trigger_actions.get(context.trigger()) {
            action
                .execute(object, context.request(), context.cancellation())
                .await
                .map_err(FireError::Callback)?;
        }

        let Some(config) = self.states.get(&starting) else {
            debug!(state = starting.name(), "state is not configured");
            return Ok(TransitionResult::undefined(context.trigger().clone(), starting));
        };

        let seed = TransitionResult::unchanged(context.trigger().clone(), starting);
        let result = config
            .fire_trigger(&self.resolver(), object, context, &seed)
            .await?;
        self.settle(object, context, result).await
    }

    fn resolver(&self) -> Resolver<'_, T, S, Tr, P> {
        Resolver {
            states: &self.states,
            access: &self.access,
            listeners: &self.listeners,
        }
    }

    /// Run exit, entry and re-entry actions for `latest`, then follow
    /// automatic transitions until one declines or the cascade limit hits.
    async fn settle(
        &self,
        object: &mut T,
        context: &ExecutionContext<'_, Tr, P>,
        mut latest: TransitionResult<S, Tr>,
    ) -> Result<TransitionResult<S, Tr>, FireError> {
        let resolver = self.resolver();
        let mut cascaded = 0;

        while latest.was_successful() {
            let previous = latest.previous_state().clone();
            let current = latest.current_state().clone();

            if previous == current {
                if let Some(config) = self.states.get(&current) {
                    let ran = config
                        .execute_reentry_action(&resolver, object, context)
                        .await?;
                    trace!(state = current.name(), ran, "self transition");
                }
                break;
            }

            if let Some(config) = self.states.get(&previous) {
                config.execute_exit_action(object, context, &latest).await?;
            }
            let Some(config) = self.states.get(&current) else {
                break;
            };
            config.execute_entry_action(object, context, &latest).await?;

            let limit = self.options.max_cascade_steps;
            let within_limit = |destination: &S| {
                if cascaded < limit {
                    return Ok(true);
                }
                match self.options.on_cascade_limit {
                    CascadeLimitStrategy::Fail => Err(FireError::CascadeLimitExceeded {
                        limit,
                        state: current.name().to_string(),
                    }),
                    CascadeLimitStrategy::Stop => {
                        warn!(
                            limit,
                            state = current.name(),
                            next = destination.name(),
                            "cascade limit reached, stopping"
                        );
                        Ok(false)
                    }
                }
            };

            let step = config
                .execute_auto_transition(&resolver, object, context, &latest, within_limit)
                .await?;
            match step {
                None => break,
                Some(next) if next.was_cancelled() => {
                    debug!(state = current.name(), "cascade cancelled");
                    latest = next;
                    break;
                }
                Some(next) => {
                    cascaded += 1;
                    latest = next;
                }
            }
        }

        Ok(latest)
    }
}
