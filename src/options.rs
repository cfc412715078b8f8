//! Tunable limits for a state machine.
//!
//! Automatic transitions chain without an external trigger, so a cyclic
//! configuration whose guards keep passing would never settle. The cascade
//! limit bounds how many automatic steps one firing may apply.
//!
//! # Example
//!
//! ```rust
//! use stateline::options::{CascadeLimitStrategy, MachineOptions, OptionsBuilder};
//!
//! let options = OptionsBuilder::new()
//!     .max_cascade_steps(8)
//!     .on_cascade_limit(CascadeLimitStrategy::Stop)
//!     .build();
//! assert_eq!(options.max_cascade_steps, 8);
//!
//! let parsed = MachineOptions::from_json(r#"{ "max_cascade_steps": 8, "on_cascade_limit": "stop" }"#)
//!     .unwrap();
//! assert_eq!(parsed, options);
//! ```

use crate::builder::ConfigError;
use serde::{Deserialize, Serialize};

/// Default bound on automatic transitions per firing.
pub const DEFAULT_MAX_CASCADE_STEPS: usize = 64;

/// What to do when a firing reaches the cascade limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CascadeLimitStrategy {
    /// Return `FireError::CascadeLimitExceeded`
    Fail,

    /// Log a warning and return the last applied result
    Stop,
}

/// Options applied to every firing of one machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineOptions {
    /// Maximum automatic transitions applied after the triggered one
    pub max_cascade_steps: usize,

    /// Behaviour once `max_cascade_steps` is reached
    pub on_cascade_limit: CascadeLimitStrategy,
}

impl Default for MachineOptions {
    fn default() -> Self {
        Self {
            max_cascade_steps: DEFAULT_MAX_CASCADE_STEPS,
            on_cascade_limit: CascadeLimitStrategy::Fail,
        }
    }
}

impl MachineOptions {
    /// Parse options from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::InvalidOptions(e.to_string()))
    }
}

/// Builder for machine options
pub struct OptionsBuilder {
    max_cascade_steps: usize,
    on_cascade_limit: CascadeLimitStrategy,
}

impl OptionsBuilder {
    pub fn new() -> Self {
        let defaults = MachineOptions::default();
        Self {
            max_cascade_steps: defaults.max_cascade_steps,
            on_cascade_limit: defaults.on_cascade_limit,
        }
    }

    /// Set the maximum number of automatic transitions per firing
    pub fn max_cascade_steps(mut self, steps: usize) -> Self {
        self.max_cascade_steps = steps;
        self
    }

    /// Set the cascade limit handling strategy
    pub fn on_cascade_limit(mut self, strategy: CascadeLimitStrategy) -> Self {
        self.on_cascade_limit = strategy;
        self
    }

    pub fn build(self) -> MachineOptions {
        MachineOptions {
            max_cascade_steps: self.max_cascade_steps,
            on_cascade_limit: self.on_cascade_limit,
        }
    }
}

impl Default for OptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_starts_from_defaults() {
        assert_eq!(OptionsBuilder::new().build(), MachineOptions::default());
    }

    #[test]
    fn from_json_fills_missing_fields() {
        let options = MachineOptions::from_json(r#"{ "max_cascade_steps": 3 }"#).unwrap();

        assert_eq!(options.max_cascade_steps, 3);
        assert_eq!(options.on_cascade_limit, CascadeLimitStrategy::Fail);
    }

    #[test]
    fn from_json_rejects_unknown_strategy() {
        let result = MachineOptions::from_json(r#"{ "on_cascade_limit": "retry" }"#);

        assert!(matches!(result, Err(ConfigError::InvalidOptions(_))));
    }

    #[test]
    fn options_roundtrip_through_json() {
        let options = OptionsBuilder::new()
            .max_cascade_steps(2)
            .on_cascade_limit(CascadeLimitStrategy::Stop)
            .build();

        let json = serde_json::to_string(&options).unwrap();
        assert_eq!(MachineOptions::from_json(&json).unwrap(), options);
    }
}
