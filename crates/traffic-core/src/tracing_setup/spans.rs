//! Span definitions per schedule operation: register, commit, unregister, query.

/// Create a commit span.
#[macro_export]
macro_rules! commit_span {
    ($participant:expr, $segments:expr) => {
        tracing::debug_span!("traffic.commit", participant = %$participant, segments = $segments)
    };
}

/// Create a query span.
#[macro_export]
macro_rules! query_span {
    ($version:expr) => {
        tracing::debug_span!("traffic.query", version = $version)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const REGISTER: &str = "traffic.register";
    pub const COMMIT: &str = "traffic.commit";
    pub const UNREGISTER: &str = "traffic.unregister";
    pub const QUERY: &str = "traffic.query";
}
