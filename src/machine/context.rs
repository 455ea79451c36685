//! Handle given to state callbacks while the guard is held.

use crate::core::{State, StateHistory, StateId, StateTransition, INACTIVE_STATE};
use crate::machine::hsm::{Hsm, Slot};
use chrono::Utc;
use tracing::debug;

/// Guarded view of a machine, passed to every [`StateHandler`] callback.
///
/// The machine's guard is already held for the lifetime of the context, so
/// transitions requested here run immediately and in place. Calling
/// [`Hsm::raise`], [`Hsm::transition`] or [`Hsm::exit`] on the same machine
/// from inside a callback is rejected with
/// [`HsmError::Reentrant`](crate::machine::HsmError::Reentrant).
///
/// [`StateHandler`]: crate::core::StateHandler
pub struct Context<'a> {
    machine: &'a Hsm,
    slot: &'a mut Slot,
}

impl<'a> Context<'a> {
    pub(crate) fn new(machine: &'a Hsm, slot: &'a mut Slot) -> Self {
        Self { machine, slot }
    }

    /// The machine this callback belongs to.
    pub fn machine(&self) -> &'a Hsm {
        self.machine
    }

    pub fn current(&self) -> Option<&'static State> {
        self.slot.current
    }

    pub fn current_state(&self) -> StateId {
        self.slot.current.map_or(INACTIVE_STATE, State::id)
    }

    pub fn history(&self) -> &StateHistory {
        &self.slot.history
    }

    /// Flat transition: run the outgoing state's exit callback, make `dst`
    /// current, then run `dst`'s entry callback. Ancestors of either side
    /// are not visited. `None` deactivates the machine without running the
    /// machine-level exit hook.
    pub fn transition(&mut self, dst: Option<&'static State>) {
        let src = self.slot.current;
        debug!(
            machine = %self.machine.name(),
            from = src.map(State::name),
            to = dst.map(State::name),
            "transition"
        );

        if let Some(src) = src {
            src.handler().on_exit(self);
        }

        self.slot.current = dst;
        self.machine.publish(dst);
        self.slot.history.record(StateTransition {
            from: src.map(State::id),
            to: dst.map(State::id),
            timestamp: Utc::now(),
        });

        if let Some(dst) = dst {
            dst.handler().on_entry(self);
        }
    }

    pub fn transition_to(&mut self, dst: &'static State) {
        self.transition(Some(dst));
    }
}
