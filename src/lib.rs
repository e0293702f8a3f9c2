//! SaaS Forecast - Parametric financial projection engine for subscription businesses
//!
//! This library provides:
//! - Period-by-period customer cohort projections (churn, organic growth,
//!   funnel acquisition)
//! - Revenue modeling across segments, billing mixes, and upsell modules
//! - Cost modeling (threshold-based staffing, escalating technical costs,
//!   marketing budgets)
//! - Derived SaaS metrics (ARPU, LTV, CAC payback, NRR, Rule of 40)
//! - Named scenario storage with parallel batch runs

pub mod assumptions;
pub mod error;
pub mod projection;
pub mod scenario;

// Re-export commonly used types
pub use assumptions::{Assumptions, CostModel, Segment, UpsellModule};
pub use error::ModelError;
pub use projection::{MetricsSnapshot, Period, ProjectionEngine, ProjectionResult};
pub use scenario::ScenarioStore;
