//! Participant identity.
//!
//! # Examples
//!
//! ```
//! use traffic_schedule::ParticipantId;
//!
//! let named = ParticipantId::from("agv-7");
//! assert_eq!(named.as_str(), "agv-7");
//!
//! let fresh = ParticipantId::random();
//! assert_ne!(fresh, ParticipantId::random());
//! ```

use serde::{Deserialize, Serialize};

/// Name of an agent taking part in the schedule.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub String);

impl ParticipantId {
    /// A fresh id backed by a random UUID v4.
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ParticipantId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ParticipantId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
