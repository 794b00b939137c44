use serde::{Deserialize, Serialize};

/// Logging configuration consumed by [`crate::tracing_setup`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Base log level when `TRAFFIC_LOG` is not set. Default: "info".
    pub log_level: String,
    /// Emit JSON lines instead of human-readable output. Default: false.
    pub json_output: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_output: false,
        }
    }
}

impl ObservabilityConfig {
    /// Levels accepted by `log_level`.
    pub const LEVELS: [&'static str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

    /// Filter directive scoping `log_level` to the traffic crates.
    pub fn filter_directive(&self) -> String {
        format!(
            "traffic_core={level},traffic_schedule={level}",
            level = self.log_level
        )
    }
}
