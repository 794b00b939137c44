//! Top-level traffic configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{ObservabilityConfig, ScheduleConfig};
use crate::constants::ENV_PREFIX;
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`TRAFFIC_*`)
/// 2. Config file passed to [`TrafficConfig::load`]
/// 3. Compiled defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TrafficConfig {
    pub schedule: ScheduleConfig,
    pub observability: ObservabilityConfig,
}

impl TrafficConfig {
    /// Load configuration from an optional TOML file, then apply `TRAFFIC_*`
    /// environment overrides and validate the result.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string. Missing keys keep their defaults.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Apply overrides read through `lookup`, which receives full variable
    /// names such as `TRAFFIC_SCHEDULE_MAX_HISTORY`. Unparseable values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |suffix: &str| lookup(&format!("{ENV_PREFIX}{suffix}"));

        if let Some(v) = var("SCHEDULE_MAX_HISTORY").and_then(|v| v.parse::<usize>().ok()) {
            self.schedule.max_history_per_participant = v;
        }
        if let Some(v) = var("SCHEDULE_REJECT_EMPTY").and_then(|v| v.parse::<bool>().ok()) {
            self.schedule.reject_empty_trajectories = v;
        }
        if let Some(v) = var("LOG_LEVEL") {
            self.observability.log_level = v.to_ascii_lowercase();
        }
        if let Some(v) = var("LOG_JSON").and_then(|v| v.parse::<bool>().ok()) {
            self.observability.json_output = v;
        }
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !ObservabilityConfig::LEVELS.contains(&self.observability.log_level.as_str()) {
            return Err(ConfigError::ValidationFailed {
                field: "observability.log_level".to_string(),
                message: format!(
                    "'{}' is not one of {:?}",
                    self.observability.log_level,
                    ObservabilityConfig::LEVELS
                ),
            });
        }
        Ok(())
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}
