//! Transition listeners owned by one machine.

use crate::core::{State, TransitionResult};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Callback told about every applied transition.
pub type TransitionListener<T, S, Tr> = Arc<dyn Fn(&T, &TransitionResult<S, Tr>) + Send + Sync>;

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(Uuid);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Listener registry scoped to a single machine instance.
///
/// Listeners run synchronously, in subscription order, once per applied
/// transition. Declined and unmatched firings notify nobody.
pub struct TransitionListeners<T, S: State, Tr> {
    listeners: Vec<(ListenerId, TransitionListener<T, S, Tr>)>,
}

impl<T, S: State, Tr> TransitionListeners<T, S, Tr> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&T, &TransitionResult<S, Tr>) + Send + Sync + 'static,
    {
        let id = ListenerId(Uuid::new_v4());
        self.listeners.push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener; returns `false` if the id was unknown.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub(crate) fn notify(&self, object: &T, result: &TransitionResult<S, Tr>) {
        for (_, listener) in &self.listeners {
            listener(object, result);
        }
    }
}

impl<T, S: State, Tr> Default for TransitionListeners<T, S, Tr> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_enum;
    use std::sync::Mutex;

    state_enum! {
        enum Light {
            Red,
            Green,
        }
    }

    #[test]
    fn notify_runs_listeners_in_subscription_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut listeners: TransitionListeners<(), Light, &str> = TransitionListeners::new();

        let first = Arc::clone(&seen);
        listeners.subscribe(move |_, _| first.lock().unwrap().push("first".to_string()));
        let second = Arc::clone(&seen);
        listeners.subscribe(move |_, result| {
            second
                .lock()
                .unwrap()
                .push(result.last_transition_name().to_string())
        });

        let result = TransitionResult::applied("go", Light::Red, Light::Red, Light::Green, "go");
        listeners.notify(&(), &result);

        assert_eq!(*seen.lock().unwrap(), vec!["first", "go"]);
    }

    #[test]
    fn unsubscribe_removes_only_that_listener() {
        let mut listeners: TransitionListeners<(), Light, &str> = TransitionListeners::new();
        let keep = listeners.subscribe(|_, _| {});
        let drop = listeners.subscribe(|_, _| {});

        assert!(listeners.unsubscribe(drop));
        assert!(!listeners.unsubscribe(drop));
        assert_eq!(listeners.len(), 1);
        assert_ne!(keep, drop);
    }
}
