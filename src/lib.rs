//! Stateline: hierarchical asynchronous state management
//!
//! Stateline keeps state logic out of the objects it governs. A
//! [`StateMachine`] is configured once per object type with the transitions,
//! guards and callbacks each state allows; firing a trigger then resolves
//! the applicable transition, writes the new state through a caller-supplied
//! mutator and runs exit, entry and automatic transitions in order.
//!
//! # Core Concepts
//!
//! - **State**: Type-safe state identifiers via the `State` trait
//! - **Superstates**: States inherit transitions and callbacks they lack
//! - **Automatic transitions**: Chains that continue without a trigger
//! - **Results**: Every firing reports flags and the path it took
//!
//! # Example
//!
//! ```rust
//! use stateline::builder::{guarded_transition, simple_transition};
//! use stateline::state_enum;
//! use stateline::StateMachine;
//! use tokio_util::sync::CancellationToken;
//!
//! state_enum! {
//!     enum SaleState {
//!         Open,
//!         ChangeDue,
//!         Complete,
//!     }
//! }
//!
//! #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
//! enum SaleEvent {
//!     Pay,
//! }
//!
//! struct Sale {
//!     state: SaleState,
//!     balance: i64,
//! }
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let mut machine: StateMachine<Sale, SaleState, SaleEvent> =
//!     StateMachine::new(|sale: &Sale| sale.state, |sale: &mut Sale, state| sale.state = state);
//!
//! machine
//!     .configure_state(SaleState::Open)
//!     .add_transition(
//!         SaleEvent::Pay,
//!         guarded_transition(SaleState::ChangeDue, |sale: &Sale| sale.balance < 0),
//!     );
//! machine
//!     .configure_state(SaleState::ChangeDue)
//!     .add_auto_forward_transition(simple_transition(SaleState::Complete), None)
//!     .unwrap();
//!
//! let mut sale = Sale { state: SaleState::Open, balance: -5 };
//! let result = machine
//!     .fire_trigger(&mut sale, SaleEvent::Pay, &CancellationToken::new())
//!     .await
//!     .unwrap();
//!
//! assert!(result.was_successful());
//! assert_eq!(sale.state, SaleState::Complete);
//! assert_eq!(result.starting_state(), &SaleState::Open);
//! assert_eq!(result.history().len(), 2);
//! # });
//! ```

pub mod builder;
pub mod core;
pub mod effects;
pub mod options;

// Re-export commonly used types
pub use builder::{ConfigError, StateMachineBuilder, TransitionBuilder};
pub use core::{Action, Guard, Selector, State, TransitionResult, Trigger};
pub use effects::{FireError, StateMachine, Transition};
pub use options::MachineOptions;
