use traffic_core::Trajectory;

use crate::participant::ParticipantId;

/// A caller-supplied query criterion.
///
/// Closures of the right shape implement this directly:
///
/// ```
/// use traffic_core::Trajectory;
/// use traffic_schedule::{ParticipantId, Query};
///
/// let long_plans = Query::all().filter(|_: &ParticipantId, t: &Trajectory| t.len() > 10);
/// # let _ = long_plans;
/// ```
pub trait TrajectoryFilter: Send + Sync {
    fn matches(&self, participant: &ParticipantId, trajectory: &Trajectory) -> bool;
}

impl<F> TrajectoryFilter for F
where
    F: Fn(&ParticipantId, &Trajectory) -> bool + Send + Sync,
{
    fn matches(&self, participant: &ParticipantId, trajectory: &Trajectory) -> bool {
        self(participant, trajectory)
    }
}
