//! Network configuration.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{RegistryError, Result};

/// Configuration for a [`Network`](crate::Network).
///
/// ```json
/// { "max_commit_attempts": 5, "top_up": { "upg100": 100, "upg2500": 2500 } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkConfig {
    /// How many times a submitted invocation is executed before a commit
    /// conflict is reported to the caller.
    pub max_commit_attempts: u32,
    /// Payment reference to coin amount.
    pub top_up: BTreeMap<String, u64>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            max_commit_attempts: 3,
            top_up: [("upg100", 100), ("upg500", 500), ("upg1000", 1000)]
                .into_iter()
                .map(|(reference, amount)| (reference.to_string(), amount))
                .collect(),
        }
    }
}

impl NetworkConfig {
    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| RegistryError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_commit_attempts == 0 {
            return Err(RegistryError::InvalidConfig(
                "max_commit_attempts must be at least 1".to_string(),
            ));
        }
        if let Some((reference, _)) = self.top_up.iter().find(|(_, amount)| **amount == 0) {
            return Err(RegistryError::InvalidConfig(format!(
                "top-up reference {:?} credits zero coins",
                reference
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let config = NetworkConfig::default();
        assert_eq!(config.top_up.get("upg500"), Some(&500));
        assert_eq!(config.top_up.len(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config = NetworkConfig::from_json(r#"{ "max_commit_attempts": 7 }"#).unwrap();
        assert_eq!(config.max_commit_attempts, 7);
        assert_eq!(config.top_up, NetworkConfig::default().top_up);
    }

    #[test]
    fn test_from_json_replaces_table() {
        let config = NetworkConfig::from_json(r#"{ "top_up": { "gift": 5 } }"#).unwrap();
        assert_eq!(config.top_up.len(), 1);
        assert_eq!(config.top_up.get("gift"), Some(&5));
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        assert!(NetworkConfig::from_json(r#"{ "max_commit_attempts": 0 }"#).is_err());
        assert!(NetworkConfig::from_json(r#"{ "top_up": { "free": 0 } }"#).is_err());
        assert!(NetworkConfig::from_json(r#"{ "retries": 3 }"#).is_err());
        assert!(NetworkConfig::from_json("not json").is_err());
    }
}
