//! State nodes and the handler trait they dispatch to.
//!
//! A [`State`] is an immutable node in the hierarchy: a name, an id that
//! external code can branch on, an optional parent, and a [`StateHandler`]
//! that reacts to entry, exit and signals. States are `'static` singletons,
//! declared once and shared by reference between any number of machines.

use crate::machine::Context;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer event code delivered to a state machine.
pub type Signal = i32;

/// Opaque tag attached to a state and reported by
/// [`Hsm::current_state`](crate::machine::Hsm::current_state).
pub type StateId = i32;

/// Id reported by a machine that has not been entered (or has been exited).
pub const INACTIVE_STATE: StateId = -1;

/// Outcome reported by a state's signal handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalStatus {
    /// The state processed the signal; bubbling stops.
    Handled,
    /// The state ignored the signal; it is offered to the parent next.
    NotHandled,
}

impl SignalStatus {
    pub fn is_handled(self) -> bool {
        matches!(self, Self::Handled)
    }
}

/// Behaviour attached to a state.
///
/// `on_entry` and `on_exit` default to doing nothing, which is how a state
/// declares that it has no lifecycle callback. `on_signal` is mandatory.
///
/// Every callback runs while the machine's guard is held. A handler that
/// wants to change state calls [`Context::transition_to`] on the context it
/// was given rather than going back through the machine.
///
/// # Example
///
/// ```rust
/// use hsm::core::{Signal, SignalStatus, State, StateHandler};
/// use hsm::machine::Context;
///
/// struct Idle;
///
/// impl StateHandler for Idle {
///     fn on_signal(&self, ctx: &mut Context<'_>, signal: Signal) -> SignalStatus {
///         match signal {
///             1 => {
///                 ctx.transition_to(&BUSY);
///                 SignalStatus::Handled
///             }
///             _ => SignalStatus::NotHandled,
///         }
///     }
/// }
///
/// struct Busy;
///
/// impl StateHandler for Busy {
///     fn on_signal(&self, _ctx: &mut Context<'_>, _signal: Signal) -> SignalStatus {
///         SignalStatus::NotHandled
///     }
/// }
///
/// static IDLE: State = State::new("Idle", 0, None, &Idle);
/// static BUSY: State = State::new("Busy", 1, None, &Busy);
///
/// assert_eq!(IDLE.id(), 0);
/// assert!(BUSY.parent().is_none());
/// ```
pub trait StateHandler: Send + Sync {
    /// Runs when the state becomes current.
    fn on_entry(&self, _ctx: &mut Context<'_>) {}

    /// Runs when the state stops being current.
    fn on_exit(&self, _ctx: &mut Context<'_>) {}

    /// Processes a signal raised while this state (or one of its
    /// descendants) is current.
    fn on_signal(&self, ctx: &mut Context<'_>, signal: Signal) -> SignalStatus;
}

/// One node of a state hierarchy.
///
/// Parent links never form a cycle. That is the integrator's
/// responsibility; [`StateRegistry`](crate::registry::StateRegistry) can
/// check it when asked.
pub struct State {
    name: &'static str,
    id: StateId,
    parent: Option<&'static State>,
    handler: &'static dyn StateHandler,
}

impl State {
    /// Declare a state. Usable in `static` items.
    pub const fn new(
        name: &'static str,
        id: StateId,
        parent: Option<&'static State>,
        handler: &'static dyn StateHandler,
    ) -> Self {
        Self {
            name,
            id,
            parent,
            handler,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn id(&self) -> StateId {
        self.id
    }

    pub fn parent(&self) -> Option<&'static State> {
        self.parent
    }

    pub fn handler(&self) -> &'static dyn StateHandler {
        self.handler
    }

    /// Walk from this state up to the root, this state first.
    pub fn ancestors(&'static self) -> Ancestors {
        Ancestors { next: Some(self) }
    }

    /// Identity comparison; two states are the same node only if they are
    /// the same allocation.
    pub fn is(&self, other: &State) -> bool {
        std::ptr::eq(self, other)
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("name", &self.name)
            .field("id", &self.id)
            .field("parent", &self.parent.map(State::name))
            .finish()
    }
}

/// Iterator over a state's parent chain. See [`State::ancestors`].
pub struct Ancestors {
    next: Option<&'static State>,
}

impl Iterator for Ancestors {
    type Item = &'static State;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent;
        Some(current)
    }
}
