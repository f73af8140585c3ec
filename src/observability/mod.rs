//! Observability: operation counters and timing.

pub mod metrics;

pub use metrics::{MetricsSnapshot, ServiceMetrics, Timer};
