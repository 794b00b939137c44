use crate::time::Time;

/// Trajectory mutation and lookup errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrajectoryError {
    #[error("time conflict: a segment already finishes at {time}")]
    TimeConflict { time: Time },

    #[error("invalid segment handle: {key}")]
    InvalidHandle { key: String },

    #[error("trajectory is inconsistent: {details}")]
    Inconsistent { details: String },
}
