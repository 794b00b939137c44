//! Time aliases shared by trajectories and the schedule.

use chrono::{DateTime, Utc};

use crate::errors::{TrafficError, TrafficResult};

/// Absolute point in time for segment arrivals.
pub type Time = DateTime<Utc>;

/// Signed span of time. Negative values move arrivals earlier.
pub type Duration = chrono::Duration;

/// Add `delta` to `time`, reporting overflow instead of panicking.
pub fn checked_shift(time: Time, delta: Duration) -> TrafficResult<Time> {
    time.checked_add_signed(delta)
        .ok_or_else(|| TrafficError::InvalidArgument {
            field: "delta".to_string(),
            reason: format!("shifting {time} by {delta} leaves the representable range"),
        })
}

/// Seconds between two times as a float, positive when `to` is later.
pub fn seconds_between(from: Time, to: Time) -> f64 {
    let delta = to - from;
    match delta.num_nanoseconds() {
        Some(nanos) => nanos as f64 * 1e-9,
        None => delta.num_milliseconds() as f64 * 1e-3,
    }
}
