//! Findings reported when validating a state registry.

use crate::core::StateId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A problem with how a set of states is wired together.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryViolation {
    #[error("Registry contains no states")]
    Empty,

    #[error("State '{name}' is registered more than once")]
    DuplicateState { name: String },

    #[error("States '{first}' and '{second}' share id {id}")]
    DuplicateId {
        id: StateId,
        first: String,
        second: String,
    },

    #[error("State '{state}' has parent '{parent}' which is not registered")]
    UnregisteredParent { state: String, parent: String },

    #[error("Parent chain of state '{state}' never reaches a root")]
    ParentCycle { state: String },
}
