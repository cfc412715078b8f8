//! Guarded transitions and their evaluation.

use crate::core::{ExecutionContext, Guard, Selector, State, StateAccess, Trigger, TransitionResult};
use crate::effects::error::FireError;
use crate::effects::listeners::TransitionListeners;
use tracing::{debug, trace};

/// Where a transition leads.
pub enum Target<T, S, P> {
    /// Fixed destination
    State(S),
    /// Destination computed at firing time
    Select(Selector<T, S, P>),
}

/// A single candidate transition.
///
/// Immutable once registered. Higher `priority` is evaluated first; ties
/// keep registration order.
pub struct Transition<T, S, P = ()> {
    pub(crate) target: Target<T, S, P>,
    pub(crate) guard: Option<Guard<T, P>>,
    pub(crate) name: String,
    pub(crate) priority: u32,
}

impl<T, S: State, P> Transition<T, S, P> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn priority(&self) -> u32 {
        self.priority
    }

    /// Fixed destination, `None` for dynamic transitions.
    pub fn destination(&self) -> Option<&S> {
        match &self.target {
            Target::State(state) => Some(state),
            Target::Select(_) => None,
        }
    }

    pub fn is_guarded(&self) -> bool {
        self.guard.is_some()
    }

    /// Try to apply this transition to `object`.
    ///
    /// The starting state comes from `prior` when given, otherwise from the
    /// object. A set cancellation signal, checked before and after the guard
    /// wait, declines the step without touching the object.
    pub async fn evaluate<Tr: Trigger>(
        &self,
        access: &StateAccess<T, S>,
        listeners: &TransitionListeners<T, S, Tr>,
        object: &mut T,
        context: &ExecutionContext<'_, Tr, P>,
        prior: Option<&TransitionResult<S, Tr>>,
    ) -> Result<TransitionResult<S, Tr>, FireError> {
        let base = match prior {
            Some(prior) => prior.clone(),
            None => TransitionResult::unchanged(context.trigger().clone(), access.get(object)),
        };
        match self.destination_for(object, context).await? {
            Some(destination) => Ok(self.apply(access, listeners, object, &base, destination)),
            None => Ok(base.declined(context.is_cancelled())),
        }
    }

    /// Run the guard and selector without touching the object.
    ///
    /// `None` means the transition declined; the context tells whether it
    /// was cancelled.
    pub(crate) async fn destination_for<Tr: Trigger>(
        &self,
        object: &T,
        context: &ExecutionContext<'_, Tr, P>,
    ) -> Result<Option<S>, FireError> {
        if context.is_cancelled() {
            trace!(transition = %self.name, "cancelled before guard");
            return Ok(None);
        }

        if let Some(guard) = &self.guard {
            let passed = guard
                .check(object, context.request(), context.cancellation())
                .await
                .map_err(FireError::Callback)?;
            if !passed || context.is_cancelled() {
                trace!(transition = %self.name, cancelled = context.is_cancelled(), "guard declined");
                return Ok(None);
            }
        }

        match &self.target {
            Target::State(state) => Ok(Some(state.clone())),
            Target::Select(selector) => {
                let selected = selector
                    .evaluate(object, context.request(), context.cancellation())
                    .await
                    .map_err(FireError::Callback)?
                    .flatten();
                match selected {
                    Some(state) if !context.is_cancelled() => Ok(Some(state)),
                    _ => {
                        trace!(transition = %self.name, "selector declined");
                        Ok(None)
                    }
                }
            }
        }
    }

    /// Write `destination` through the mutator and notify listeners.
    pub(crate) fn apply<Tr: Trigger>(
        &self,
        access: &StateAccess<T, S>,
        listeners: &TransitionListeners<T, S, Tr>,
        object: &mut T,
        base: &TransitionResult<S, Tr>,
        destination: S,
    ) -> TransitionResult<S, Tr> {
        let previous = access.get(object);
        access.set(object, destination);
        let current = access.get(object);

        debug!(
            transition = %self.name,
            from = previous.name(),
            to = current.name(),
            "transition applied"
        );

        let result = base.advanced(previous, current, &self.name);
        listeners.notify(object, &result);
        result
    }
}
