use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::SpawnPolicy;
use crate::error::{EngineError, SerializationError};

/// Tunables for a [`GridEngine`](crate::engine::GridEngine).
///
/// Every field has a default, so a TOML file only needs the keys it changes:
///
/// ```toml
/// history_depth = 5
/// spawn_policy = "one_or_two"
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Number of undo snapshots kept (at least 1).
    #[serde(default = "defaults::history_depth")]
    pub history_depth: usize,

    /// How many tiles spawn after an effective move.
    #[serde(default)]
    pub spawn_policy: SpawnPolicy,

    /// Probability that a spawned tile is a 4 instead of a 2.
    #[serde(default = "defaults::four_probability")]
    pub four_probability: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            history_depth: defaults::history_depth(),
            spawn_policy: SpawnPolicy::default(),
            four_probability: defaults::four_probability(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.history_depth == 0 {
            return Err(EngineError::InvalidConfig("history_depth must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.four_probability) {
            return Err(EngineError::InvalidConfig(format!(
                "four_probability must be within [0, 1], got {}",
                self.four_probability
            )));
        }
        Ok(())
    }

    /// Parse and validate a config from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, SerializationError> {
        let cfg: Self = toml::from_str(contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a TOML config file.
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self, SerializationError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}

mod defaults {
    pub fn history_depth() -> usize { 20 }
    pub fn four_probability() -> f64 { 0.1 }
}
