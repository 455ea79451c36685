//! Read-only snapshots of a running machine.
//!
//! A snapshot captures what a machine looks like at one instant: whether it
//! is active, which state is current and its recent transition history.
//! Snapshots are for diagnostics and export. There is deliberately no way
//! to load one back into a machine, since that would let a caller inject a
//! current state the machine never transitioned into.

use crate::core::{StateHistory, StateId};
use crate::machine::{Hsm, HsmError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod error;

pub use error::SnapshotError;

/// Version identifier for snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serializable view of a machine at one instant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MachineSnapshot {
    /// Snapshot format version
    pub version: u32,

    /// Instance id of the machine
    pub machine_id: Uuid,

    /// Configured machine name
    pub machine_name: String,

    /// When the snapshot was taken
    pub timestamp: DateTime<Utc>,

    /// Id of the top state
    pub top: StateId,

    /// Id of the current state, `None` while inactive
    pub current: Option<StateId>,

    /// Retained transition history
    pub history: StateHistory,
}

impl MachineSnapshot {
    /// Capture the machine's state. Takes the machine's guard so `current`
    /// and `history` are consistent with each other.
    pub fn capture(hsm: &Hsm) -> Result<Self, HsmError> {
        let (current, history) = hsm.observe()?;
        Ok(Self {
            version: SNAPSHOT_VERSION,
            machine_id: hsm.id(),
            machine_name: hsm.name().to_string(),
            timestamp: Utc::now(),
            top: hsm.top().id(),
            current,
            history,
        })
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(json)
            .map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?;
        snapshot.check_version()
    }

    pub fn to_binary(&self) -> Result<Vec<u8>, SnapshotError> {
        bincode::serialize(self).map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    pub fn from_binary(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let snapshot: Self = bincode::deserialize(bytes)
            .map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?;
        snapshot.check_version()
    }

    fn check_version(self) -> Result<Self, SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.version,
                supported: SNAPSHOT_VERSION,
            });
        }
        Ok(self)
    }
}
