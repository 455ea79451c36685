//! The runtime half of the crate: a machine that holds the current state
//! and dispatches lifecycle calls and signals to it.
//!
//! # Key Concepts
//!
//! - **Hsm**: binds a top state, optional machine hooks and a guard
//! - **Context**: what state callbacks receive while the guard is held
//! - **Delivery**: where a raised signal ended up
//!
//! # Locking
//!
//! `exit`, `raise` and `transition` hold the machine's guard for their whole
//! duration, callbacks included. `enter` runs the machine entry hook first,
//! outside the guard, then takes it for the transition into the top state.
//! The guard is not re-entrant: a callback that calls back into its own
//! machine gets `HsmError::Reentrant`.

mod context;
mod error;
mod hsm;

pub use context::Context;
pub use error::HsmError;
pub use hsm::{Delivery, Hsm, MachineHook};
