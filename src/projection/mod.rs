//! Projection engine: period recurrence, funnel, and derived metrics

pub mod engine;
pub mod funnel;
pub mod metrics;
pub mod period;

pub use engine::ProjectionEngine;
pub use metrics::{derive_metrics, MetricsSnapshot};
pub use period::{
    CostBreakdown, Period, ProjectionResult, ProjectionSummary, SegmentPeriod, Staffing,
};
