//! Asynchronous trigger evaluation.
//!
//! This module is the shell around [`crate::core`]: it resolves triggers
//! against configured states, mutates the governed object and runs the
//! caller's guards and callbacks.
//!
//! # Key Concepts
//!
//! - **Transitions**: guarded, prioritised rules towards a fixed or selected
//!   destination
//! - **State configurations**: per-state transitions, callbacks, automatic
//!   transitions and superstate links
//! - **State machine**: fires triggers and runs the exit, entry and
//!   automatic transition cascade that follows
//!
//! Firing suspends only inside caller-supplied guards and callbacks.

mod configuration;
mod error;
mod listeners;
mod machine;
pub(crate) mod registry;
mod transition;

pub use configuration::StateConfiguration;
pub use error::FireError;
pub use listeners::{ListenerId, TransitionListener, TransitionListeners};
pub use machine::StateMachine;
pub use transition::{Target, Transition};
