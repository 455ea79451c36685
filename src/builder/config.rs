//! Machine configuration.

use crate::machine::HsmError;
use serde::{Deserialize, Serialize};

/// Tunables for a machine instance.
///
/// # Example
///
/// ```rust
/// use hsm::builder::HsmConfig;
///
/// let config = HsmConfig::from_json(r#"{ "name": "pump", "history_limit": 32 }"#).unwrap();
/// assert_eq!(config.name, "pump");
/// assert_eq!(config.history_limit, 32);
///
/// // Missing fields fall back to defaults.
/// let config = HsmConfig::from_json("{}").unwrap();
/// assert_eq!(config, HsmConfig::default());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HsmConfig {
    /// Name used in log records and snapshots
    pub name: String,
    /// Number of transitions kept in history; 0 disables recording
    pub history_limit: usize,
}

impl Default for HsmConfig {
    fn default() -> Self {
        Self {
            name: "hsm".to_string(),
            history_limit: 0,
        }
    }
}

impl HsmConfig {
    pub fn from_json(json: &str) -> Result<Self, HsmError> {
        serde_json::from_str(json).map_err(|e| HsmError::Config(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, HsmError> {
        serde_json::to_string_pretty(self).map_err(|e| HsmError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_disable_history() {
        let config = HsmConfig::default();
        assert_eq!(config.name, "hsm");
        assert_eq!(config.history_limit, 0);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config = HsmConfig::from_json(r#"{ "history_limit": 4 }"#).unwrap();
        assert_eq!(config.name, "hsm");
        assert_eq!(config.history_limit, 4);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = HsmConfig::from_json(r#"{ "nmae": "typo" }"#);
        assert!(matches!(result, Err(HsmError::Config(_))));
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let result = HsmConfig::from_json("not json");
        assert!(matches!(result, Err(HsmError::Config(_))));
    }

    #[test]
    fn json_roundtrip() {
        let config = HsmConfig {
            name: "valve".into(),
            history_limit: 8,
        };
        let json = config.to_json().unwrap();
        assert_eq!(HsmConfig::from_json(&json).unwrap(), config);
    }
}
