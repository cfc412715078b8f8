//! State and trigger identifier traits.
//!
//! The engine never stores state inside the governed object's type; it only
//! compares, orders and clones identifiers chosen by the caller.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state identifiers.
///
/// All methods are pure. States are plain values (usually an enum) that
/// name a position in the state graph.
///
/// # Required Traits
///
/// - `Clone`: states are copied into results and history
/// - `Ord`: configurations are keyed and compared by ordering
/// - `Debug`: states appear in diagnostics
/// - `Serialize` + `Deserialize`: results and history are serializable
///
/// # Example
///
/// ```rust
/// use stateline::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
/// enum DoorState {
///     Open,
///     Closed,
///     Locked,
/// }
///
/// impl State for DoorState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Open => "Open",
///             Self::Closed => "Closed",
///             Self::Locked => "Locked",
///         }
///     }
/// }
///
/// assert_eq!(DoorState::Locked.name(), "Locked");
/// ```
pub trait State:
    Clone + Ord + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;
}

/// Trait for trigger identifiers.
///
/// Implemented for every type that can key a hash map and be shared across
/// threads, so callers never implement it by hand.
pub trait Trigger: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

impl<T> Trigger for T where T: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
    enum TestState {
        Open,
        ChangeDue,
        Complete,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Open => "Open",
                Self::ChangeDue => "ChangeDue",
                Self::Complete => "Complete",
            }
        }
    }

    fn assert_trigger<T: Trigger>(_: &T) {}

    #[test]
    fn state_name_returns_correct_value() {
        assert_eq!(TestState::Open.name(), "Open");
        assert_eq!(TestState::ChangeDue.name(), "ChangeDue");
        assert_eq!(TestState::Complete.name(), "Complete");
    }

    #[test]
    fn state_ordering_follows_declaration() {
        assert!(TestState::Open < TestState::ChangeDue);
        assert!(TestState::ChangeDue < TestState::Complete);
    }

    #[test]
    fn state_serializes_correctly() {
        let state = TestState::ChangeDue;
        let json = serde_json::to_string(&state).unwrap();
        let deserialized: TestState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, deserialized);
    }

    #[test]
    fn common_types_are_triggers() {
        assert_trigger(&"pay");
        assert_trigger(&42u8);
        assert_trigger(&String::from("refund"));
    }
}
