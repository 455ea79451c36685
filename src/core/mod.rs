//! Core state machine types.
//!
//! This module contains the passive building blocks of a machine:
//! - State nodes and the `StateHandler` trait they dispatch to
//! - The per-machine guard that serializes access to the current state
//! - Bounded transition history
//!
//! Nothing here drives a machine; see [`crate::machine`] for that.

mod guard;
mod history;
mod state;

pub use guard::{Guard, GuardError, Held};
pub use history::{StateHistory, StateTransition};
pub use state::{Ancestors, Signal, SignalStatus, State, StateHandler, StateId, INACTIVE_STATE};
