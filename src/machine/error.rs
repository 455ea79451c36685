//! Errors reported by machine operations.

use crate::core::GuardError;
use crate::registry::RegistryViolation;
use thiserror::Error;

/// Errors that can occur while building or driving a machine.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum HsmError {
    /// A required argument was missing or malformed.
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// A callback panicked while holding the machine's guard.
    #[error("Guard of machine '{machine}' is poisoned")]
    LockPoisoned { machine: String },

    /// The calling thread already holds the machine's guard.
    #[error("Re-entrant call on machine '{machine}'; use the handler context instead")]
    Reentrant { machine: String },

    /// Configuration could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The state registry handed to the builder failed validation.
    #[error("State registry rejected with {} violation(s)", .0.len())]
    InvalidRegistry(Vec<RegistryViolation>),
}

impl HsmError {
    pub(crate) fn from_guard(err: GuardError, machine: &str) -> Self {
        let machine = machine.to_string();
        match err {
            GuardError::Reentrant => Self::Reentrant { machine },
            GuardError::Poisoned => Self::LockPoisoned { machine },
        }
    }

    /// True for errors caused by contention on the guard rather than by
    /// the caller's input.
    pub fn is_lock_error(&self) -> bool {
        matches!(self, Self::LockPoisoned { .. } | Self::Reentrant { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_errors_map_to_lock_errors() {
        let reentrant = HsmError::from_guard(GuardError::Reentrant, "demo");
        let poisoned = HsmError::from_guard(GuardError::Poisoned, "demo");

        assert_eq!(
            reentrant,
            HsmError::Reentrant {
                machine: "demo".into()
            }
        );
        assert!(reentrant.is_lock_error());
        assert!(poisoned.is_lock_error());
        assert!(!HsmError::InvalidArgument("top").is_lock_error());
    }

    #[test]
    fn messages_name_the_machine() {
        let err = HsmError::LockPoisoned {
            machine: "pump".into(),
        };
        assert_eq!(err.to_string(), "Guard of machine 'pump' is poisoned");
    }
}
