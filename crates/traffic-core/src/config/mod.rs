//! Configuration for the traffic core and schedule.

pub mod observability_config;
pub mod schedule_config;
pub mod traffic_config;

pub use observability_config::ObservabilityConfig;
pub use schedule_config::ScheduleConfig;
pub use traffic_config::TrafficConfig;
