//! Schedule: concurrent register/commit/query over published snapshots.
//!
//! Writers to one participant are serialized by that participant's lock in a
//! `DashMap`. Each accepted change copies the participant map (its values
//! are `Arc`s) and swaps the published `Arc<ScheduleState>` under a short
//! write lock. Readers clone the published `Arc` and filter with no lock
//! held, so a query never sees half of a commit.
//!
//! # Examples
//!
//! ```
//! use traffic_core::Trajectory;
//! use traffic_schedule::{Query, Schedule, Version};
//!
//! let schedule = Schedule::default();
//! let v1 = schedule.register("agv-1".into(), Trajectory::new("L1")).unwrap();
//! let v2 = schedule.commit("agv-1".into(), Trajectory::new("L1")).unwrap();
//! assert!(v1 < v2);
//!
//! let results = schedule.query(&Query::all().changed_after(v1));
//! assert_eq!(results.len(), 1);
//! assert_eq!(results[0].revision, 1);
//! ```

use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use dashmap::DashMap;
use tracing::{debug, instrument, warn};

use traffic_core::config::ScheduleConfig;
use traffic_core::errors::{ScheduleError, TrafficResult};
use traffic_core::Trajectory;

use crate::participant::ParticipantId;
use crate::query::Query;
use crate::snapshot::{ParticipantEntry, ParticipantTrajectory, ScheduleSnapshot, ScheduleState};
use crate::version::Version;

/// Thread-safe repository of every participant's committed trajectory.
pub struct Schedule {
    config: ScheduleConfig,
    state: RwLock<Arc<ScheduleState>>,
    // Never removed on unregister, so a writer waiting on an old lock and a
    // new registration cannot end up holding different locks for one id.
    writers: DashMap<ParticipantId, Arc<Mutex<()>>>,
}

impl Schedule {
    pub fn new(config: ScheduleConfig) -> Self {
        Self {
            config,
            state: RwLock::new(Arc::new(ScheduleState::default())),
            writers: DashMap::new(),
        }
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// Add a participant with its first trajectory (revision 0).
    #[instrument(name = "traffic.register", skip_all, fields(participant = %participant))]
    pub fn register(&self, participant: ParticipantId, trajectory: Trajectory) -> TrafficResult<Version> {
        self.check_not_empty(&participant, &trajectory)?;
        let writer = Arc::clone(self.writers.entry(participant.clone()).or_default().value());
        let _guard = lock(&writer);

        if self.current().entries.contains_key(&participant) {
            warn!("registration rejected: already registered");
            return Err(ScheduleError::DuplicateParticipant {
                participant: participant.to_string(),
            }
            .into());
        }

        let trajectory = Arc::new(trajectory);
        let version = self.publish(|state| {
            let entry = ParticipantEntry {
                current: ParticipantTrajectory {
                    participant: participant.clone(),
                    revision: 0,
                    committed_at: state.version,
                    trajectory,
                },
                history: Default::default(),
            };
            state.entries.insert(participant.clone(), Arc::new(entry));
        });
        debug!(%version, "participant registered");
        Ok(version)
    }

    /// Replace a participant's trajectory.
    pub fn commit(&self, participant: ParticipantId, trajectory: Trajectory) -> TrafficResult<Version> {
        self.replace(participant, None, trajectory)
    }

    /// Replace a participant's trajectory only if its current revision is
    /// `expected_revision`.
    pub fn commit_if(
        &self,
        participant: ParticipantId,
        expected_revision: u64,
        trajectory: Trajectory,
    ) -> TrafficResult<Version> {
        self.replace(participant, Some(expected_revision), trajectory)
    }

    /// Remove a participant and its history.
    #[instrument(name = "traffic.unregister", skip_all, fields(participant = %participant))]
    pub fn unregister(&self, participant: &ParticipantId) -> TrafficResult<Version> {
        let Some(writer) = self.writer(participant) else {
            warn!("unregister rejected: not registered");
            return Err(unknown(participant));
        };
        let _guard = lock(&writer);

        if !self.current().entries.contains_key(participant) {
            warn!("unregister rejected: not registered");
            return Err(unknown(participant));
        }
        let version = self.publish(|state| {
            state.entries.remove(participant);
        });
        debug!(%version, "participant unregistered");
        Ok(version)
    }

    /// Current entries matching `query`, all from one published version.
    pub fn query(&self, query: &Query) -> Vec<ParticipantTrajectory> {
        self.snapshot().query(query)
    }

    pub fn snapshot(&self) -> ScheduleSnapshot {
        ScheduleSnapshot::new(self.current())
    }

    pub fn get(&self, participant: &ParticipantId) -> Option<ParticipantTrajectory> {
        self.current()
            .entries
            .get(participant)
            .map(|e| e.current.clone())
    }

    pub fn participants(&self) -> Vec<ParticipantId> {
        self.snapshot().participants()
    }

    pub fn version(&self) -> Version {
        self.current().version
    }

    /// Prior revisions, oldest first, at most
    /// `max_history_per_participant` of them.
    pub fn history(&self, participant: &ParticipantId) -> TrafficResult<Vec<ParticipantTrajectory>> {
        self.snapshot()
            .history(participant)
            .ok_or_else(|| unknown(participant))
    }

    fn replace(
        &self,
        participant: ParticipantId,
        expected_revision: Option<u64>,
        trajectory: Trajectory,
    ) -> TrafficResult<Version> {
        let _span = traffic_core::commit_span!(participant, trajectory.len()).entered();
        self.check_not_empty(&participant, &trajectory)?;
        let Some(writer) = self.writer(&participant) else {
            warn!("commit rejected: not registered");
            return Err(unknown(&participant));
        };
        let _guard = lock(&writer);

        let current = self.current();
        let Some(entry) = current.entries.get(&participant) else {
            warn!("commit rejected: not registered");
            return Err(unknown(&participant));
        };
        if let Some(expected) = expected_revision {
            let actual = entry.current.revision;
            if actual != expected {
                warn!(expected, actual, "commit rejected: revision mismatch");
                return Err(ScheduleError::RevisionMismatch {
                    participant: participant.to_string(),
                    expected,
                    actual,
                }
                .into());
            }
        }

        let limit = self.config.max_history_per_participant;
        let mut history = entry.history.clone();
        if limit > 0 {
            history.push_back(entry.current.clone());
        }
        while history.len() > limit {
            history.pop_front();
        }
        let revision = entry.current.revision + 1;
        drop(current);

        let trajectory = Arc::new(trajectory);
        let version = self.publish(|state| {
            let entry = ParticipantEntry {
                current: ParticipantTrajectory {
                    participant: participant.clone(),
                    revision,
                    committed_at: state.version,
                    trajectory,
                },
                history,
            };
            state.entries.insert(participant.clone(), Arc::new(entry));
        });
        debug!(%version, revision, "trajectory committed");
        Ok(version)
    }

    fn check_not_empty(&self, participant: &ParticipantId, trajectory: &Trajectory) -> TrafficResult<()> {
        if self.config.reject_empty_trajectories && trajectory.is_empty() {
            warn!(%participant, "empty trajectory rejected");
            return Err(ScheduleError::EmptyTrajectory {
                participant: participant.to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Lock of a participant that has registered at least once. Only
    /// `register` creates locks.
    fn writer(&self, participant: &ParticipantId) -> Option<Arc<Mutex<()>>> {
        self.writers.get(participant).map(|w| Arc::clone(w.value()))
    }

    fn current(&self) -> Arc<ScheduleState> {
        let guard = self.state.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Build the next state from the latest one and publish it. `apply` sees
    /// the new state with its version already assigned.
    fn publish(&self, apply: impl FnOnce(&mut ScheduleState)) -> Version {
        let mut guard = self.state.write().unwrap_or_else(|e| e.into_inner());
        let mut next = ScheduleState {
            version: guard.version.next(),
            entries: guard.entries.clone(),
        };
        apply(&mut next);
        let version = next.version;
        *guard = Arc::new(next);
        version
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self::new(ScheduleConfig::default())
    }
}

impl std::fmt::Debug for Schedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let current = self.current();
        f.debug_struct("Schedule")
            .field("version", &current.version)
            .field("participants", &current.entries.len())
            .finish()
    }
}

fn lock(writer: &Mutex<()>) -> MutexGuard<'_, ()> {
    writer.lock().unwrap_or_else(|e| e.into_inner())
}

fn unknown(participant: &ParticipantId) -> traffic_core::TrafficError {
    ScheduleError::UnknownParticipant {
        participant: participant.to_string(),
    }
    .into()
}
