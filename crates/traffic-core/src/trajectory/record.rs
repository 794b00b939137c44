//! Plain serializable form of a trajectory, for persistence layered on top.
//!
//! Profiles are written once to a table and segments refer to them by
//! index, so segments that shared a profile share one again after loading.

use std::collections::HashMap;
use std::sync::Arc;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::Trajectory;
use crate::errors::{TrafficError, TrafficResult, TrajectoryError};
use crate::geometry::ConvexShape;
use crate::profile::{Agency, Profile, ProfilePtr, ProfileState};
use crate::time::Time;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub shape: ConvexShape,
    pub agency: Agency,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRecord {
    pub finish_time: Time,
    pub finish_position: DVec3,
    pub finish_velocity: DVec3,
    /// Index into [`TrajectoryRecord::profiles`].
    pub profile: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryRecord {
    pub map_name: String,
    pub profiles: Vec<ProfileRecord>,
    /// Ascending by finish time.
    pub segments: Vec<SegmentRecord>,
}

impl Trajectory {
    /// Capture the current contents as a record.
    pub fn to_record(&self) -> TrajectoryRecord {
        let mut table: HashMap<*const Profile, usize> = HashMap::new();
        let mut profiles = Vec::new();
        let mut segments = Vec::with_capacity(self.len());

        for segment in self.iter() {
            let index = *table
                .entry(Arc::as_ptr(&segment.profile))
                .or_insert_with(|| {
                    let state = segment.profile.state();
                    profiles.push(ProfileRecord {
                        shape: state.shape,
                        agency: state.agency,
                    });
                    profiles.len() - 1
                });
            segments.push(SegmentRecord {
                finish_time: segment.finish_time,
                finish_position: segment.finish_position,
                finish_velocity: segment.finish_velocity,
                profile: index,
            });
        }

        TrajectoryRecord {
            map_name: self.map_name.clone(),
            profiles,
            segments,
        }
    }

    /// Rebuild a trajectory from a record. Segment order in the record does
    /// not matter; duplicate times and dangling profile indices are rejected.
    pub fn from_record(record: &TrajectoryRecord) -> TrafficResult<Self> {
        let profiles: Vec<ProfilePtr> = record
            .profiles
            .iter()
            .map(|p| {
                Profile::from_state(ProfileState {
                    shape: p.shape,
                    agency: p.agency.clone(),
                })
            })
            .collect::<TrafficResult<_>>()?;

        let mut trajectory = Trajectory::new(record.map_name.clone());
        for segment in &record.segments {
            let profile = profiles.get(segment.profile).ok_or_else(|| {
                TrafficError::invalid_argument(
                    "profile",
                    format!(
                        "segment refers to profile {} but only {} exist",
                        segment.profile,
                        profiles.len()
                    ),
                )
            })?;
            let result = trajectory.insert(
                segment.finish_time,
                Arc::clone(profile),
                segment.finish_position,
                segment.finish_velocity,
            );
            if !result.inserted {
                return Err(TrajectoryError::TimeConflict {
                    time: segment.finish_time,
                }
                .into());
            }
        }
        Ok(trajectory)
    }
}
