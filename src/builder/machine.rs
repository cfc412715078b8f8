//! Builder for constructing state machines.

use crate::builder::error::ConfigError;
use crate::core::access::{Accessor, Mutator};
use crate::core::{State, StateAccess, Trigger};
use crate::effects::StateMachine;
use crate::options::MachineOptions;
use std::marker::PhantomData;
use std::sync::Arc;

/// Builder for constructing state machines with a fluent API.
///
/// # Example
///
/// ```
/// use stateline::builder::StateMachineBuilder;
/// use stateline::state_enum;
///
/// state_enum! {
///     enum DoorState {
///         Open,
///         Closed,
///     }
/// }
///
/// struct Door {
///     state: DoorState,
/// }
///
/// let machine = StateMachineBuilder::<Door, DoorState, &str>::new()
///     .accessor(|door: &Door| door.state)
///     .mutator(|door: &mut Door, state| door.state = state)
///     .build()
///     .unwrap();
///
/// assert_eq!(machine.state_of(&Door { state: DoorState::Closed }), DoorState::Closed);
/// ```
pub struct StateMachineBuilder<T, S, Tr, P = ()> {
    accessor: Option<Accessor<T, S>>,
    mutator: Option<Mutator<T, S>>,
    options: MachineOptions,
    _phantom: PhantomData<fn(Tr, P)>,
}

impl<T, S: State, Tr: Trigger, P> StateMachineBuilder<T, S, Tr, P> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            accessor: None,
            mutator: None,
            options: MachineOptions::default(),
            _phantom: PhantomData,
        }
    }

    /// Set how the state is read from an object (required).
    pub fn accessor<F>(mut self, accessor: F) -> Self
    where
        F: Fn(&T) -> S + Send + Sync + 'static,
    {
        self.accessor = Some(Arc::new(accessor));
        self
    }

    /// Set how the state is written to an object (required).
    pub fn mutator<F>(mut self, mutator: F) -> Self
    where
        F: Fn(&mut T, S) + Send + Sync + 'static,
    {
        self.mutator = Some(Arc::new(mutator));
        self
    }

    pub fn options(mut self, options: MachineOptions) -> Self {
        self.options = options;
        self
    }

    /// Build the state machine.
    /// Returns an error if the accessor or mutator is missing.
    pub fn build(self) -> Result<StateMachine<T, S, Tr, P>, ConfigError> {
        let accessor = self.accessor.ok_or(ConfigError::MissingAccessor)?;
        let mutator = self.mutator.ok_or(ConfigError::MissingMutator)?;

        let access = StateAccess::from_parts(accessor, mutator);
        Ok(StateMachine::from_access(access).with_options(self.options))
    }
}

impl<T, S: State, Tr: Trigger, P> Default for StateMachineBuilder<T, S, Tr, P> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{CascadeLimitStrategy, OptionsBuilder};
    use crate::state_enum;

    state_enum! {
        enum TestState {
            Open,
            Complete,
        }
    }

    struct Sale {
        state: TestState,
    }

    type Builder = StateMachineBuilder<Sale, TestState, &'static str>;

    #[test]
    fn builder_requires_accessor() {
        let result = Builder::new()
            .mutator(|sale: &mut Sale, state| sale.state = state)
            .build();

        assert!(matches!(result, Err(ConfigError::MissingAccessor)));
    }

    #[test]
    fn builder_requires_mutator() {
        let result = Builder::new().accessor(|sale: &Sale| sale.state).build();

        assert!(matches!(result, Err(ConfigError::MissingMutator)));
    }

    #[test]
    fn builder_installs_options() {
        let machine = Builder::new()
            .accessor(|sale: &Sale| sale.state)
            .mutator(|sale: &mut Sale, state| sale.state = state)
            .options(
                OptionsBuilder::new()
                    .on_cascade_limit(CascadeLimitStrategy::Stop)
                    .build(),
            )
            .build()
            .unwrap();

        assert_eq!(
            machine.options().on_cascade_limit,
            CascadeLimitStrategy::Stop
        );
        assert_eq!(
            machine.state_of(&Sale {
                state: TestState::Complete
            }),
            TestState::Complete
        );
        assert!(!machine.is_in_state(
            &Sale {
                state: TestState::Open
            },
            &TestState::Complete
        ));
    }
}
