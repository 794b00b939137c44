//! # traffic-schedule
//!
//! The shared schedule: every participant's committed trajectory, published
//! as immutable versioned snapshots that conflict checkers query.

pub mod participant;
pub mod query;
pub mod schedule;
pub mod snapshot;
pub mod version;

pub use participant::ParticipantId;
pub use query::{ParticipantFilter, Query, Region, TrajectoryFilter};
pub use schedule::Schedule;
pub use snapshot::{ParticipantTrajectory, ScheduleSnapshot};
pub use version::Version;
