//! Arena of state configurations and the superstate graph over them.

use crate::builder::ConfigError;
use crate::core::{State, Trigger};
use crate::effects::configuration::StateConfiguration;
use std::collections::{BTreeMap, BTreeSet};

/// All configurations of one machine, keyed by state.
///
/// Superstate links are stored as identifiers on each configuration and
/// resolved through this map, so one configuration can be the superstate
/// of any number of substates.
pub(crate) struct StateRegistry<T, S: State, Tr, P> {
    configurations: BTreeMap<S, StateConfiguration<T, S, Tr, P>>,
}

impl<T, S: State, Tr: Trigger, P> StateRegistry<T, S, Tr, P> {
    pub(crate) fn new() -> Self {
        Self {
            configurations: BTreeMap::new(),
        }
    }

    pub(crate) fn get(&self, state: &S) -> Option<&StateConfiguration<T, S, Tr, P>> {
        self.configurations.get(state)
    }

    /// Get the configuration for `state`, creating an empty one if needed.
    pub(crate) fn configure(&mut self, state: S) -> &mut StateConfiguration<T, S, Tr, P> {
        self.configurations
            .entry(state.clone())
            .or_insert_with(|| StateConfiguration::new(state))
    }

    pub(crate) fn len(&self) -> usize {
        self.configurations.len()
    }

    /// Link `superstate` above `state`.
    ///
    /// Rejects self links, repeated links and links that would close a
    /// cycle. Nothing is created when the link is rejected.
    pub(crate) fn add_super_state(&mut self, state: &S, superstate: S) -> Result<(), ConfigError> {
        if *state == superstate {
            return Err(ConfigError::SelfSuperState {
                state: state.name().to_string(),
            });
        }
        if self
            .get(state)
            .is_some_and(|config| config.super_states().contains(&superstate))
        {
            return Err(ConfigError::DuplicateSuperState {
                state: state.name().to_string(),
                superstate: superstate.name().to_string(),
            });
        }
        if self.reaches(&superstate, state) {
            return Err(ConfigError::SuperStateCycle {
                state: state.name().to_string(),
                superstate: superstate.name().to_string(),
            });
        }

        self.configure(superstate.clone());
        self.configure(state.clone()).push_super_state(superstate);
        Ok(())
    }

    /// Whether `target` is `from` or one of its transitive superstates.
    fn reaches(&self, from: &S, target: &S) -> bool {
        let mut pending = vec![from];
        let mut visited = BTreeSet::new();
        while let Some(state) = pending.pop() {
            if state == target {
                return true;
            }
            if !visited.insert(state) {
                continue;
            }
            if let Some(config) = self.get(state) {
                pending.extend(config.super_states());
            }
        }
        false
    }

    /// `root` followed by its superstates, depth first in declaration order.
    ///
    /// A superstate reachable along several paths is listed once, at its
    /// first position.
    pub(crate) fn lineage<'r>(
        &'r self,
        root: &'r StateConfiguration<T, S, Tr, P>,
    ) -> Vec<&'r StateConfiguration<T, S, Tr, P>> {
        let mut lineage = Vec::new();
        let mut visited = BTreeSet::new();
        let mut pending = vec![root];
        while let Some(config) = pending.pop() {
            if !visited.insert(config.state()) {
                continue;
            }
            lineage.push(config);
            pending.extend(
                config
                    .super_states()
                    .iter()
                    .rev()
                    .filter_map(|state| self.get(state)),
            );
        }
        lineage
    }
}
