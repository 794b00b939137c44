use std::cmp::Ordering;
use std::fmt;
use std::ops::Bound::{Excluded, Unbounded};

use super::{Segment, SegmentKey, Trajectory};
use crate::time::Time;

/// A read-only position in a trajectory: a live segment or the end placeholder.
///
/// Cursors compare by current time order. `end` sorts after every segment and
/// equals only another `end` of the same trajectory. Cursors from different
/// trajectories are unordered and never equal.
#[derive(Clone, Copy)]
pub struct Cursor<'a> {
    trajectory: &'a Trajectory,
    position: Option<(Time, u32)>,
}

impl<'a> Cursor<'a> {
    pub(super) fn at(trajectory: &'a Trajectory, time: Time, slot: u32) -> Self {
        Self {
            trajectory,
            position: Some((time, slot)),
        }
    }

    pub(super) fn end(trajectory: &'a Trajectory) -> Self {
        Self {
            trajectory,
            position: None,
        }
    }

    pub fn is_end(&self) -> bool {
        self.position.is_none()
    }

    /// Key of the segment under the cursor; `None` at the end.
    pub fn key(&self) -> Option<SegmentKey> {
        self.position.map(|(_, slot)| self.trajectory.key_for(slot))
    }

    /// The segment under the cursor; `None` at the end.
    pub fn segment(&self) -> Option<&'a Segment> {
        let (_, slot) = self.position?;
        self.trajectory.segment_at(slot)
    }

    /// One step later in time. Stepping past the last segment yields `end`;
    /// stepping from `end` yields `None`.
    pub fn next(&self) -> Option<Self> {
        let (time, _) = self.position?;
        let position = self
            .trajectory
            .order
            .range((Excluded(time), Unbounded))
            .next()
            .map(|(&t, &s)| (t, s));
        Some(Self {
            trajectory: self.trajectory,
            position,
        })
    }

    /// One step earlier in time. From `end` this is the last segment; from
    /// the first segment it is `None`.
    pub fn prev(&self) -> Option<Self> {
        let before = match self.position {
            Some((time, _)) => self.trajectory.order.range(..time).next_back(),
            None => self.trajectory.order.iter().next_back(),
        };
        before.map(|(&t, &s)| Self::at(self.trajectory, t, s))
    }

    fn rank(&self) -> (bool, Option<Time>) {
        (self.is_end(), self.position.map(|(t, _)| t))
    }
}

impl PartialEq for Cursor<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.trajectory, other.trajectory) && self.position == other.position
    }
}

impl PartialOrd for Cursor<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if !std::ptr::eq(self.trajectory, other.trajectory) {
            return None;
        }
        Some(self.rank().cmp(&other.rank()))
    }
}

impl fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some((time, _)) => f
                .debug_struct("Cursor")
                .field("key", &self.key())
                .field("finish_time", &time)
                .finish(),
            None => f.write_str("Cursor(end)"),
        }
    }
}
