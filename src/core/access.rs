//! Accessor/mutator pair bound to one governed object type.

use std::fmt;
use std::sync::Arc;

pub(crate) type Accessor<T, S> = Arc<dyn Fn(&T) -> S + Send + Sync>;
pub(crate) type Mutator<T, S> = Arc<dyn Fn(&mut T, S) + Send + Sync>;

/// Reads and writes the state field of a caller-owned object.
///
/// The engine keeps no copy of the object's state; every read goes through
/// the accessor and every transition goes through the mutator.
pub struct StateAccess<T, S> {
    accessor: Accessor<T, S>,
    mutator: Mutator<T, S>,
}

impl<T, S> StateAccess<T, S> {
    pub fn new<A, M>(accessor: A, mutator: M) -> Self
    where
        A: Fn(&T) -> S + Send + Sync + 'static,
        M: Fn(&mut T, S) + Send + Sync + 'static,
    {
        Self {
            accessor: Arc::new(accessor),
            mutator: Arc::new(mutator),
        }
    }

    pub(crate) fn from_parts(accessor: Accessor<T, S>, mutator: Mutator<T, S>) -> Self {
        Self { accessor, mutator }
    }

    /// Read the object's current state.
    pub fn get(&self, object: &T) -> S {
        (self.accessor)(object)
    }

    /// Overwrite the object's state.
    pub fn set(&self, object: &mut T, state: S) {
        (self.mutator)(object, state)
    }
}

impl<T, S> Clone for StateAccess<T, S> {
    fn clone(&self) -> Self {
        Self {
            accessor: Arc::clone(&self.accessor),
            mutator: Arc::clone(&self.mutator),
        }
    }
}

impl<T, S> fmt::Debug for StateAccess<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateAccess").finish_non_exhaustive()
    }
}
