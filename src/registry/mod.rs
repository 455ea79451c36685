//! Optional validation of the states wired into a machine.
//!
//! The engine itself never checks the hierarchy: states are declared by the
//! integrator and trusted. A [`StateRegistry`] lets integration code (or a
//! test) collect the states it declared and check them all at once, using
//! `stillwater`'s `Validation` to report every problem rather than the
//! first one.
//!
//! # Example
//!
//! ```rust
//! use hsm::core::{Signal, SignalStatus, State, StateHandler};
//! use hsm::machine::Context;
//! use hsm::registry::StateRegistry;
//!
//! struct Inert;
//!
//! impl StateHandler for Inert {
//!     fn on_signal(&self, _ctx: &mut Context<'_>, _signal: Signal) -> SignalStatus {
//!         SignalStatus::NotHandled
//!     }
//! }
//!
//! static ROOT: State = State::new("Root", 0, None, &Inert);
//! static CHILD: State = State::new("Child", 1, Some(&ROOT), &Inert);
//!
//! let registry = StateRegistry::new().with(&ROOT).with(&CHILD);
//! assert!(registry.validate().is_success());
//! assert_eq!(registry.find(1).map(State::name), Some("Child"));
//! ```

mod violations;

pub use violations::RegistryViolation;

use crate::core::{State, StateId};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Check = Validation<(), NonEmptyVec<RegistryViolation>>;

/// The set of states an integrator wires into one or more machines.
#[derive(Debug, Clone, Default)]
pub struct StateRegistry {
    states: Vec<&'static State>,
}

impl StateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, state: &'static State) -> Self {
        self.register(state);
        self
    }

    pub fn register(&mut self, state: &'static State) {
        self.states.push(state);
    }

    pub fn contains(&self, state: &State) -> bool {
        self.states.iter().any(|s| s.is(state))
    }

    pub fn find(&self, id: StateId) -> Option<&'static State> {
        self.states.iter().copied().find(|s| s.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static State> + '_ {
        self.states.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Check every registered state, accumulating ALL violations.
    pub fn validate(&self) -> Check {
        if self.states.is_empty() {
            return Validation::fail(RegistryViolation::Empty);
        }

        let mut checks: Vec<Check> = Vec::new();

        for (i, &state) in self.states.iter().enumerate() {
            for other in &self.states[..i] {
                if other.is(state) {
                    checks.push(Validation::fail(RegistryViolation::DuplicateState {
                        name: state.name().to_string(),
                    }));
                } else if other.id() == state.id() {
                    checks.push(Validation::fail(RegistryViolation::DuplicateId {
                        id: state.id(),
                        first: other.name().to_string(),
                        second: state.name().to_string(),
                    }));
                }
            }

            checks.push(self.check_parent(state));
            checks.push(self.check_chain(state));
        }

        Validation::all_vec(checks).map(|_| ())
    }

    fn check_parent(&self, state: &State) -> Check {
        match state.parent() {
            Some(parent) if !self.contains(parent) => {
                Validation::fail(RegistryViolation::UnregisteredParent {
                    state: state.name().to_string(),
                    parent: parent.name().to_string(),
                })
            }
            _ => Validation::success(()),
        }
    }

    /// A chain longer than every registered state plus one cannot be
    /// acyclic, whether or not the extra links are registered.
    fn check_chain(&self, state: &'static State) -> Check {
        let bound = self.states.len() + 1;
        if state.ancestors().take(bound + 1).count() > bound {
            // Only blame the state if it sits on the cycle itself.
            let on_cycle = state.ancestors().skip(1).take(bound).any(|s| s.is(state));
            if on_cycle {
                return Validation::fail(RegistryViolation::ParentCycle {
                    state: state.name().to_string(),
                });
            }
        }
        Validation::success(())
    }
}
