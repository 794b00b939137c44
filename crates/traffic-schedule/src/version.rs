use serde::{Deserialize, Serialize};

/// Schedule-wide publication counter. Every successful register, commit, or
/// unregister publishes exactly one new version.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Version(pub u64);

impl Version {
    /// The version of an empty schedule.
    pub const INITIAL: Version = Version(0);

    pub fn next(self) -> Self {
        Version(self.0.wrapping_add(1))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.0)
    }
}
