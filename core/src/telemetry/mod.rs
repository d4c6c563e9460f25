pub mod log;
pub mod metrics;

pub use log::CycleLog;
pub use metrics::{CycleMetrics, MetricsSnapshot};
