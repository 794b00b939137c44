//! Consistency checks for tests and diagnostics.

use super::Trajectory;
use crate::errors::{TrafficResult, TrajectoryError};

/// Verify that the order index, the arena, and cursor comparisons agree.
///
/// Checks that every indexed slot holds a live segment stamped with the
/// index time, that no live segment is missing from the index, that times
/// strictly increase, and that each cursor sorts after its predecessor.
pub fn check_time_consistency(trajectory: &Trajectory) -> TrafficResult<()> {
    let live = trajectory
        .slots
        .iter()
        .filter(|slot| slot.segment.is_some())
        .count();
    if live != trajectory.order.len() {
        return Err(inconsistent(format!(
            "{live} live segments but {} indexed",
            trajectory.order.len()
        )));
    }

    let mut previous = None;
    for (&time, &slot) in &trajectory.order {
        let segment = trajectory
            .segment_at(slot)
            .ok_or_else(|| inconsistent(format!("index points at empty slot {slot}")))?;
        if segment.finish_time != time {
            return Err(inconsistent(format!(
                "slot {slot} indexed at {time} but finishes at {}",
                segment.finish_time
            )));
        }
        if let Some(before) = previous {
            if before >= time {
                return Err(inconsistent(format!("{before} is not before {time}")));
            }
        }
        previous = Some(time);
    }

    let mut cursor = trajectory.begin();
    let mut steps = 0;
    while let Some(next) = cursor.next() {
        if !(cursor < next) {
            return Err(inconsistent(format!(
                "cursor {cursor:?} does not sort before {next:?}"
            )));
        }
        cursor = next;
        steps += 1;
    }
    if steps != trajectory.len() || cursor != trajectory.end() {
        return Err(inconsistent(format!(
            "walked {steps} steps over {} segments",
            trajectory.len()
        )));
    }
    Ok(())
}

/// Boolean form of [`check_time_consistency`].
pub fn is_time_consistent(trajectory: &Trajectory) -> bool {
    check_time_consistency(trajectory).is_ok()
}

fn inconsistent(details: String) -> crate::errors::TrafficError {
    TrajectoryError::Inconsistent { details }.into()
}
