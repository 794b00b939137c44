use glam::DVec3;

use super::{SegmentKey, Trajectory};
use crate::errors::TrafficResult;
use crate::profile::ProfilePtr;
use crate::time::{Duration, Time};

/// One arrival event: where the agent is, how fast it moves, and which
/// profile it carries when it reaches the end of this leg.
#[derive(Debug, Clone)]
pub struct Segment {
    pub(crate) finish_time: Time,
    pub(crate) finish_position: DVec3,
    pub(crate) finish_velocity: DVec3,
    pub(crate) profile: ProfilePtr,
}

impl Segment {
    pub fn finish_time(&self) -> Time {
        self.finish_time
    }

    /// Planar position plus heading in the z component.
    pub fn finish_position(&self) -> DVec3 {
        self.finish_position
    }

    pub fn finish_velocity(&self) -> DVec3 {
        self.finish_velocity
    }

    /// The shared profile. Mutating it is visible to every segment holding it.
    pub fn profile(&self) -> &ProfilePtr {
        &self.profile
    }
}

/// Mutable access to one segment through its owning trajectory.
///
/// Time changes go through the trajectory so ordering is restored before
/// the call returns.
pub struct SegmentMut<'a> {
    pub(crate) trajectory: &'a mut Trajectory,
    pub(crate) key: SegmentKey,
}

impl<'a> SegmentMut<'a> {
    pub fn key(&self) -> SegmentKey {
        self.key
    }

    pub fn get(&self) -> TrafficResult<&Segment> {
        self.trajectory.get(self.key)
    }

    /// Point this segment at another profile. Other segments keep theirs.
    pub fn set_profile(&mut self, profile: ProfilePtr) -> TrafficResult<()> {
        self.trajectory.set_profile(self.key, profile)
    }

    pub fn set_finish_position(&mut self, position: DVec3) -> TrafficResult<()> {
        self.trajectory.set_finish_position(self.key, position)
    }

    pub fn set_finish_velocity(&mut self, velocity: DVec3) -> TrafficResult<()> {
        self.trajectory.set_finish_velocity(self.key, velocity)
    }

    /// See [`Trajectory::set_finish_time`].
    pub fn set_finish_time(&mut self, time: Time) -> TrafficResult<()> {
        self.trajectory.set_finish_time(self.key, time)
    }

    /// See [`Trajectory::adjust_finish_times`].
    pub fn adjust_finish_times(&mut self, delta: Duration) -> TrafficResult<()> {
        self.trajectory.adjust_finish_times(self.key, delta)
    }
}
