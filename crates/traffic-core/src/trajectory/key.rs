use std::fmt;

/// Stable handle to one segment of one trajectory.
///
/// A key stays valid while its segment exists, no matter how often segments
/// are inserted, erased, or re-timed around it. Erasing the segment retires
/// the key for good: its slot may be reused, but under a new generation.
/// Keys never resolve in a different trajectory, including clones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SegmentKey {
    pub(crate) trajectory: u64,
    pub(crate) slot: u32,
    pub(crate) generation: u32,
}

impl fmt::Display for SegmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "segment {}#{} of trajectory {}",
            self.slot, self.generation, self.trajectory
        )
    }
}
