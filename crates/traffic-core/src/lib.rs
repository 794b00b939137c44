//! # traffic-core
//!
//! Foundation crate for the traffic schedule.
//! Defines profiles, segments, trajectories, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod geometry;
pub mod profile;
pub mod time;
pub mod tracing_setup;
pub mod trajectory;

// Re-export the most commonly used types at the crate root.
pub use config::TrafficConfig;
pub use errors::{TrafficError, TrafficResult};
pub use geometry::ConvexShape;
pub use glam::{DVec2, DVec3};
pub use profile::{Agency, Profile, ProfilePtr, QueueInfo};
pub use time::{Duration, Time};
pub use trajectory::{Cursor, InsertionResult, Segment, SegmentKey, SegmentMut, Trajectory};
