//! Core state machine types.
//!
//! This module contains the data the engine threads through a firing:
//! - State and trigger identifiers via the `State` and `Trigger` traits
//! - The accessor/mutator pair bound to the governed object type
//! - Guards, selectors and actions supplied by the caller
//! - The execution context and the transition result record
//! - Immutable history of the steps applied during one firing
//!
//! Nothing here decides which transition applies; that lives in
//! [`crate::effects`].

use std::future::Future;
use std::pin::Pin;

pub(crate) mod access;
mod action;
mod context;
mod guard;
mod history;
mod result;
mod state;

pub use access::StateAccess;
pub use action::Action;
pub use context::ExecutionContext;
pub use guard::{Guard, Query, Selector};
pub use history::{StateHistory, StateTransition};
pub use result::TransitionResult;
pub use state::{State, Trigger};

/// Boxed future returned by guards, selectors and actions.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Error raised by caller-supplied guards and callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
