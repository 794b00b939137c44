//! Immutable published views of the schedule.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use traffic_core::Trajectory;

use crate::participant::ParticipantId;
use crate::query::Query;
use crate::version::Version;

/// One committed trajectory as the schedule holds it.
#[derive(Debug, Clone)]
pub struct ParticipantTrajectory {
    pub participant: ParticipantId,
    /// Commits accepted for this participant since registration; 0 right
    /// after `register`.
    pub revision: u64,
    /// Schedule version that published this revision.
    pub committed_at: Version,
    pub trajectory: Arc<Trajectory>,
}

#[derive(Debug, Clone)]
pub(crate) struct ParticipantEntry {
    pub(crate) current: ParticipantTrajectory,
    /// Prior revisions, oldest first.
    pub(crate) history: VecDeque<ParticipantTrajectory>,
}

#[derive(Debug, Default)]
pub(crate) struct ScheduleState {
    pub(crate) version: Version,
    pub(crate) entries: BTreeMap<ParticipantId, Arc<ParticipantEntry>>,
}

/// A consistent view of the schedule at one version.
///
/// Holding a snapshot never blocks writers; later commits publish new
/// snapshots and leave this one untouched.
#[derive(Debug, Clone)]
pub struct ScheduleSnapshot {
    state: Arc<ScheduleState>,
}

impl ScheduleSnapshot {
    pub(crate) fn new(state: Arc<ScheduleState>) -> Self {
        Self { state }
    }

    pub fn version(&self) -> Version {
        self.state.version
    }

    pub fn len(&self) -> usize {
        self.state.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.entries.is_empty()
    }

    pub fn get(&self, participant: &ParticipantId) -> Option<&ParticipantTrajectory> {
        self.state.entries.get(participant).map(|e| &e.current)
    }

    /// Registered participants in id order.
    pub fn participants(&self) -> Vec<ParticipantId> {
        self.state.entries.keys().cloned().collect()
    }

    /// Prior revisions of `participant`, oldest first.
    pub fn history(&self, participant: &ParticipantId) -> Option<Vec<ParticipantTrajectory>> {
        self.state
            .entries
            .get(participant)
            .map(|e| e.history.iter().cloned().collect())
    }

    /// Current entries matching `query`, in participant id order.
    pub fn query(&self, query: &Query) -> Vec<ParticipantTrajectory> {
        let _span = traffic_core::query_span!(self.state.version.as_u64()).entered();
        let results: Vec<ParticipantTrajectory> = self
            .state
            .entries
            .values()
            .map(|e| &e.current)
            .filter(|current| query.matches(current))
            .cloned()
            .collect();
        tracing::trace!(matched = results.len(), "query evaluated");
        results
    }
}
