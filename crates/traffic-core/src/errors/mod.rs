//! Error handling for the traffic core.
//! One error enum per subsystem, `thiserror` only, aggregated by [`TrafficError`].

pub mod config_error;
pub mod schedule_error;
pub mod trajectory_error;

pub use config_error::ConfigError;
pub use schedule_error::ScheduleError;
pub use trajectory_error::TrajectoryError;

/// Top-level error returned by every fallible traffic operation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TrafficError {
    #[error("invalid argument for {field}: {reason}")]
    InvalidArgument { field: String, reason: String },

    #[error("trajectory error: {0}")]
    Trajectory(#[from] TrajectoryError),

    #[error("schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl TrafficError {
    /// Shorthand for [`TrafficError::InvalidArgument`].
    pub fn invalid_argument(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// True when a mutation was rejected because two segments would share a time.
    pub fn is_time_conflict(&self) -> bool {
        matches!(self, Self::Trajectory(TrajectoryError::TimeConflict { .. }))
    }

    /// True when a segment key no longer (or never did) address a live segment.
    pub fn is_invalid_handle(&self) -> bool {
        matches!(self, Self::Trajectory(TrajectoryError::InvalidHandle { .. }))
    }
}

/// Result type alias for traffic operations.
pub type TrafficResult<T> = Result<T, TrafficError>;
