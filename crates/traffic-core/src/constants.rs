/// Traffic core version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default number of superseded trajectory revisions kept per participant.
pub const DEFAULT_MAX_HISTORY_PER_PARTICIPANT: usize = 10;

/// Environment variable holding the tracing filter directive.
pub const LOG_ENV_VAR: &str = "TRAFFIC_LOG";

/// Filter used when `TRAFFIC_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "traffic_core=info,traffic_schedule=info";

/// Prefix for environment overrides applied by `TrafficConfig::load`.
pub const ENV_PREFIX: &str = "TRAFFIC_";
