//! Schedule queries.
//!
//! A [`Query`] combines a participant filter, any number of space-time
//! [`Region`]s, a "changed after" version, and custom [`TrajectoryFilter`]s.
//! An entry matches when it passes every criterion that is set; with no
//! regions, space and time are unrestricted.
//!
//! # Examples
//!
//! ```
//! use traffic_schedule::{Query, Region, Version};
//!
//! let query = Query::all()
//!     .exclude(["agv-1"])
//!     .region(Region::new("L1"))
//!     .changed_after(Version(4));
//! assert_eq!(query.regions().len(), 1);
//! ```

pub mod filter;
pub mod region;

pub use filter::TrajectoryFilter;
pub use region::Region;

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::participant::ParticipantId;
use crate::snapshot::ParticipantTrajectory;
use crate::version::Version;

/// Which participants a query considers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParticipantFilter {
    #[default]
    All,
    Include(BTreeSet<ParticipantId>),
    Exclude(BTreeSet<ParticipantId>),
}

impl ParticipantFilter {
    pub fn matches(&self, participant: &ParticipantId) -> bool {
        match self {
            ParticipantFilter::All => true,
            ParticipantFilter::Include(set) => set.contains(participant),
            ParticipantFilter::Exclude(set) => !set.contains(participant),
        }
    }
}

/// Criteria for selecting committed trajectories.
#[derive(Clone, Default)]
#[non_exhaustive]
pub struct Query {
    participants: ParticipantFilter,
    regions: Vec<Region>,
    after_version: Option<Version>,
    filters: Vec<Arc<dyn TrajectoryFilter>>,
}

impl Query {
    /// Everything in the schedule.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn participants(mut self, filter: ParticipantFilter) -> Self {
        self.participants = filter;
        self
    }

    /// Only these participants.
    pub fn include<I, P>(self, participants: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<ParticipantId>,
    {
        self.participants(ParticipantFilter::Include(
            participants.into_iter().map(Into::into).collect(),
        ))
    }

    /// Everyone but these participants.
    pub fn exclude<I, P>(self, participants: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<ParticipantId>,
    {
        self.participants(ParticipantFilter::Exclude(
            participants.into_iter().map(Into::into).collect(),
        ))
    }

    /// Add a region. Entries match if they overlap any one region.
    pub fn region(mut self, region: Region) -> Self {
        self.regions.push(region);
        self
    }

    /// Only entries committed after `version`.
    pub fn changed_after(mut self, version: Version) -> Self {
        self.after_version = Some(version);
        self
    }

    /// Add a custom criterion. Entries must satisfy every filter.
    pub fn filter(mut self, filter: impl TrajectoryFilter + 'static) -> Self {
        self.filters.push(Arc::new(filter));
        self
    }

    pub fn participant_filter(&self) -> &ParticipantFilter {
        &self.participants
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn after_version(&self) -> Option<Version> {
        self.after_version
    }

    pub fn matches(&self, entry: &ParticipantTrajectory) -> bool {
        if !self.participants.matches(&entry.participant) {
            return false;
        }
        if self
            .after_version
            .is_some_and(|after| entry.committed_at <= after)
        {
            return false;
        }
        if !self.regions.is_empty()
            && !self
                .regions
                .iter()
                .any(|region| region.overlaps(&entry.trajectory))
        {
            return false;
        }
        self.filters
            .iter()
            .all(|f| f.matches(&entry.participant, &entry.trajectory))
    }
}

impl fmt::Debug for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("participants", &self.participants)
            .field("regions", &self.regions)
            .field("after_version", &self.after_version)
            .field("filters", &self.filters.len())
            .finish()
    }
}
