//! Motion between arrivals.
//!
//! Each leg runs from the previous arrival to the next one along a cubic
//! Hermite curve fixed by the two arrival positions and velocities. The
//! curve passes exactly through every stored arrival.

use glam::DVec3;

use super::Trajectory;
use crate::time::{seconds_between, Time};

/// Position and velocity of an agent at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionState {
    pub position: DVec3,
    pub velocity: DVec3,
}

/// Where the agent is at `time`, or `None` outside `[start_time, finish_time]`.
pub fn interpolate(trajectory: &Trajectory, time: Time) -> Option<MotionState> {
    let (_, &next_slot) = trajectory.order.range(time..).next()?;
    let next = trajectory.segment_at(next_slot)?;
    if next.finish_time == time {
        return Some(MotionState {
            position: next.finish_position,
            velocity: next.finish_velocity,
        });
    }

    let (_, &prev_slot) = trajectory.order.range(..time).next_back()?;
    let prev = trajectory.segment_at(prev_slot)?;

    let dt = seconds_between(prev.finish_time, next.finish_time);
    let s = seconds_between(prev.finish_time, time) / dt;
    Some(hermite(
        prev.finish_position,
        prev.finish_velocity,
        next.finish_position,
        next.finish_velocity,
        dt,
        s,
    ))
}

fn hermite(p0: DVec3, v0: DVec3, p1: DVec3, v1: DVec3, dt: f64, s: f64) -> MotionState {
    let s2 = s * s;
    let s3 = s2 * s;

    let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
    let h10 = s3 - 2.0 * s2 + s;
    let h01 = -2.0 * s3 + 3.0 * s2;
    let h11 = s3 - s2;

    let d00 = 6.0 * s2 - 6.0 * s;
    let d10 = 3.0 * s2 - 4.0 * s + 1.0;
    let d01 = -6.0 * s2 + 6.0 * s;
    let d11 = 3.0 * s2 - 2.0 * s;

    let position = h00 * p0 + h10 * dt * v0 + h01 * p1 + h11 * dt * v1;
    let velocity = (d00 * p0 + d10 * dt * v0 + d01 * p1 + d11 * dt * v1) / dt;
    MotionState { position, velocity }
}
