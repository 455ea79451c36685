//! Hsm: a hierarchical state machine engine
//!
//! States are arranged in a parent/child hierarchy. When a signal is raised,
//! the most specific (current) state is asked to handle it first; if it
//! declines, the signal bubbles to its parent, then to the grandparent, and
//! so on until some state handles it or the root declines it too. A child
//! therefore inherits every response of its ancestors that it does not
//! override.
//!
//! # Core Concepts
//!
//! - **State**: an immutable `'static` node with a parent link, an id and a
//!   `StateHandler` providing entry, exit and signal callbacks
//! - **Hsm**: the runtime machine holding the current state behind a guard
//! - **Context**: what callbacks receive; transitions requested through it
//!   run in place, under the guard that is already held
//! - **Flat transitions**: only the outgoing state's exit and the incoming
//!   state's entry callbacks run; ancestors are never exited or entered
//!
//! # Example
//!
//! ```rust
//! use hsm::core::{Signal, SignalStatus, StateHandler};
//! use hsm::hsm_state;
//! use hsm::machine::{Context, Hsm};
//!
//! const STOP: Signal = 0;
//! const FAST: Signal = 1;
//!
//! struct Running;
//!
//! impl StateHandler for Running {
//!     fn on_signal(&self, ctx: &mut Context<'_>, signal: Signal) -> SignalStatus {
//!         match signal {
//!             STOP => {
//!                 ctx.transition(None);
//!                 SignalStatus::Handled
//!             }
//!             _ => SignalStatus::NotHandled,
//!         }
//!     }
//! }
//!
//! struct Slow;
//!
//! impl StateHandler for Slow {
//!     fn on_signal(&self, ctx: &mut Context<'_>, signal: Signal) -> SignalStatus {
//!         match signal {
//!             FAST => {
//!                 ctx.transition_to(&FAST_STATE);
//!                 SignalStatus::Handled
//!             }
//!             _ => SignalStatus::NotHandled,
//!         }
//!     }
//! }
//!
//! struct Fast;
//!
//! impl StateHandler for Fast {
//!     fn on_signal(&self, _ctx: &mut Context<'_>, _signal: Signal) -> SignalStatus {
//!         SignalStatus::NotHandled
//!     }
//! }
//!
//! hsm_state! {
//!     static RUNNING { id: 0, handler: Running }
//!     static SLOW { id: 1, parent: RUNNING, handler: Slow }
//!     static FAST_STATE { id: 2, parent: RUNNING, handler: Fast }
//! }
//!
//! let hsm = Hsm::init(Some(&SLOW), None, None).unwrap();
//! hsm.enter().unwrap();
//!
//! hsm.raise(FAST).unwrap();
//! assert_eq!(hsm.current_state(), 2);
//!
//! // FAST_STATE ignores STOP; its parent handles it.
//! hsm.raise(STOP).unwrap();
//! assert!(!hsm.is_active());
//! ```

pub mod builder;
pub mod core;
pub mod machine;
pub mod registry;
pub mod snapshot;

// Re-export commonly used types
pub use crate::builder::{HsmBuilder, HsmConfig};
pub use crate::core::{Signal, SignalStatus, State, StateHandler, StateId, INACTIVE_STATE};
pub use crate::machine::{Context, Delivery, Hsm, HsmError};
