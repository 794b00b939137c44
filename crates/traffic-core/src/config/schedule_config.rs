//! Configuration for the participant schedule.
//!
//! # Examples
//!
//! ```
//! use traffic_core::config::ScheduleConfig;
//!
//! let config = ScheduleConfig::default();
//! assert_eq!(config.max_history_per_participant, 10);
//! assert!(!config.reject_empty_trajectories);
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MAX_HISTORY_PER_PARTICIPANT;

/// Configuration for the schedule repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Superseded revisions retained per participant. 0 disables history. Default: 10.
    pub max_history_per_participant: usize,
    /// Refuse register/commit of trajectories with no segments. Default: false.
    pub reject_empty_trajectories: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            max_history_per_participant: DEFAULT_MAX_HISTORY_PER_PARTICIPANT,
            reject_empty_trajectories: false,
        }
    }
}
