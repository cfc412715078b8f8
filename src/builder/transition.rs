//! Builder for constructing transitions.

use crate::builder::error::ConfigError;
use crate::core::{Guard, Selector, State};
use crate::effects::{Target, Transition};

/// Builder for constructing transitions with a fluent API.
pub struct TransitionBuilder<T, S, P = ()> {
    target: Option<Target<T, S, P>>,
    guard: Option<Guard<T, P>>,
    name: Option<String>,
    priority: u32,
}

impl<T: 'static, S: State, P: 'static> TransitionBuilder<T, S, P> {
    pub fn new() -> Self {
        Self {
            target: None,
            guard: None,
            name: None,
            priority: 0,
        }
    }

    /// Set a fixed destination.
    pub fn to(mut self, state: S) -> Self {
        self.target = Some(Target::State(state));
        self
    }

    /// Compute the destination when the transition fires.
    pub fn select(mut self, selector: Selector<T, S, P>) -> Self {
        self.target = Some(Target::Select(selector));
        self
    }

    /// Add an asynchronous guard (optional).
    pub fn guard(mut self, guard: Guard<T, P>) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Add a guard from a synchronous predicate (optional).
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Guard::new(move |object: &T, _| {
            let passed = predicate(object);
            Box::pin(async move { Ok(passed) })
        }));
        self
    }

    /// Set the display name reported in results.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Higher priorities are evaluated first.
    pub fn priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    /// Build the transition.
    ///
    /// Unnamed transitions are named after their fixed destination, or
    /// `"dynamic"` when the destination is selected at firing time.
    pub fn build(self) -> Result<Transition<T, S, P>, ConfigError> {
        let target = self.target.ok_or(ConfigError::MissingTarget)?;
        let name = self.name.unwrap_or_else(|| match &target {
            Target::State(state) => state.name().to_string(),
            Target::Select(_) => "dynamic".to_string(),
        });

        Ok(Transition {
            target,
            guard: self.guard,
            name,
            priority: self.priority,
        })
    }
}

impl<T: 'static, S: State, P: 'static> Default for TransitionBuilder<T, S, P> {
    fn default() -> Self {
        Self::new()
    }
}
