/// Schedule registration and commit errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("participant {participant} is already registered")]
    DuplicateParticipant { participant: String },

    #[error("participant {participant} is not registered")]
    UnknownParticipant { participant: String },

    #[error("revision mismatch for {participant}: expected {expected}, found {actual}")]
    RevisionMismatch {
        participant: String,
        expected: u64,
        actual: u64,
    },

    #[error("participant {participant} submitted an empty trajectory")]
    EmptyTrajectory { participant: String },
}
