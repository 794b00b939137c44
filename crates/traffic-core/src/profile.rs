//! Interaction profile: the footprint an agent occupies and how it negotiates.
//!
//! A [`Profile`] is shared state. Segments hold a [`ProfilePtr`] (an `Arc`),
//! several segments may point at the same profile, and a change made through
//! any pointer is seen through all of them. Give a segment its own copy with
//! [`Profile::duplicate`] when that sharing is not wanted.
//!
//! # Examples
//!
//! ```
//! use traffic_core::{Agency, ConvexShape, Profile};
//!
//! let profile = Profile::make_strict(ConvexShape::circle(0.5).unwrap());
//! let alias = profile.clone();
//!
//! profile.set_to_queued("lift-1").unwrap();
//! assert_eq!(alias.agency(), Agency::Queued { queue_id: "lift-1".into() });
//! assert!(profile.set_to_queued("").is_err());
//! ```

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use crate::errors::{TrafficError, TrafficResult};
use crate::geometry::ConvexShape;

/// Shared, mutable handle to a profile.
pub type ProfilePtr = Arc<Profile>;

/// How an agent behaves when its path interferes with another agent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Agency {
    /// Follows its path exactly; others must yield.
    Strict,
    /// May deviate or yield on its own.
    Autonomous,
    /// Waits its turn in a named queue.
    Queued { queue_id: String },
}

/// Queue membership of a queued profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueueInfo {
    queue_id: String,
}

impl QueueInfo {
    pub fn queue_id(&self) -> &str {
        &self.queue_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct ProfileState {
    pub(crate) shape: ConvexShape,
    pub(crate) agency: Agency,
}

/// Footprint plus agency, behind a lock so every alias observes mutations.
#[derive(Debug)]
pub struct Profile {
    state: RwLock<ProfileState>,
}

impl Profile {
    fn make(shape: ConvexShape, agency: Agency) -> ProfilePtr {
        Arc::new(Self {
            state: RwLock::new(ProfileState { shape, agency }),
        })
    }

    pub(crate) fn from_state(state: ProfileState) -> TrafficResult<ProfilePtr> {
        if let Agency::Queued { queue_id } = &state.agency {
            validate_queue_id(queue_id)?;
        }
        Ok(Self::make(state.shape, state.agency))
    }

    /// A profile whose agent will not yield.
    pub fn make_strict(shape: ConvexShape) -> ProfilePtr {
        Self::make(shape, Agency::Strict)
    }

    /// A profile whose agent may yield on its own.
    pub fn make_autonomous(shape: ConvexShape) -> ProfilePtr {
        Self::make(shape, Agency::Autonomous)
    }

    /// A profile whose agent waits in `queue_id`. Fails on an empty id.
    pub fn make_queued(shape: ConvexShape, queue_id: impl Into<String>) -> TrafficResult<ProfilePtr> {
        let queue_id = queue_id.into();
        validate_queue_id(&queue_id)?;
        Ok(Self::make(shape, Agency::Queued { queue_id }))
    }

    /// An independent profile with the same shape and agency.
    pub fn duplicate(&self) -> ProfilePtr {
        let state = self.read().clone();
        Self::make(state.shape, state.agency)
    }

    /// Whether two pointers alias the same profile.
    pub fn same(a: &ProfilePtr, b: &ProfilePtr) -> bool {
        Arc::ptr_eq(a, b)
    }

    pub fn shape(&self) -> ConvexShape {
        self.read().shape
    }

    pub fn agency(&self) -> Agency {
        self.read().agency.clone()
    }

    pub fn is_strict(&self) -> bool {
        matches!(self.read().agency, Agency::Strict)
    }

    pub fn is_autonomous(&self) -> bool {
        matches!(self.read().agency, Agency::Autonomous)
    }

    pub fn is_queued(&self) -> bool {
        matches!(self.read().agency, Agency::Queued { .. })
    }

    /// Queue membership, present only while the agency is `Queued`.
    pub fn queue_info(&self) -> Option<QueueInfo> {
        match &self.read().agency {
            Agency::Queued { queue_id } => Some(QueueInfo {
                queue_id: queue_id.clone(),
            }),
            _ => None,
        }
    }

    pub fn set_shape(&self, shape: ConvexShape) {
        self.write().shape = shape;
    }

    pub fn set_to_strict(&self) {
        self.write().agency = Agency::Strict;
    }

    pub fn set_to_autonomous(&self) {
        self.write().agency = Agency::Autonomous;
    }

    /// Move into `queue_id`. An empty id is rejected and the agency is left as it was.
    pub fn set_to_queued(&self, queue_id: impl Into<String>) -> TrafficResult<()> {
        let queue_id = queue_id.into();
        validate_queue_id(&queue_id)?;
        self.write().agency = Agency::Queued { queue_id };
        Ok(())
    }

    pub(crate) fn state(&self) -> ProfileState {
        self.read().clone()
    }

    // Writers never panic while holding the lock, so a poisoned lock still
    // holds a valid state.
    fn read(&self) -> RwLockReadGuard<'_, ProfileState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, ProfileState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

fn validate_queue_id(queue_id: &str) -> TrafficResult<()> {
    if queue_id.trim().is_empty() {
        return Err(TrafficError::invalid_argument(
            "queue_id",
            "a queued profile needs a non-empty queue id",
        ));
    }
    Ok(())
}
