//! Operational statistics for the fan-out layer

pub mod metrics;

pub use metrics::{FanOutStats, StatsSnapshot};
