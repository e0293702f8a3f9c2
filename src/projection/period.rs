//! Period output structures for projections

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::metrics::MetricsSnapshot;

/// Customer movement and revenue for one segment in one period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentPeriod {
    /// Customer count at the start of the period
    pub start_count: f64,

    /// Monthly churn rate applied this period (interpolated)
    pub churn_rate: f64,

    /// Customers lost to churn
    pub churned: f64,

    /// Customers gained from organic growth
    pub organic_added: f64,

    /// Customers gained from funnel acquisition
    pub acquired: f64,

    /// Customer count at the end of the period, floored at 0
    pub end_count: f64,

    /// Base subscription revenue for the period
    pub revenue: f64,
}

/// Headcount per role for one period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Staffing {
    pub founder: u32,
    pub development: u32,
    pub sales: u32,
}

impl Staffing {
    pub fn total(&self) -> u32 {
        self.founder + self.development + self.sales
    }
}

/// Cost breakdown for one period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub salaries: f64,
    pub technical: f64,
    pub marketing: f64,
}

impl CostBreakdown {
    pub fn total(&self) -> f64 {
        self.salaries + self.technical + self.marketing
    }
}

/// A single fully populated projection period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    /// Period index, 0-based
    pub index: usize,

    /// Calendar label, e.g. "Q3 2026"
    pub label: String,

    /// Per-segment movement and revenue
    pub segments: BTreeMap<String, SegmentPeriod>,

    /// Total end-of-period customers across segments
    pub total_customers: f64,

    /// Sum of per-segment base revenue
    pub base_revenue: f64,

    /// Upsell revenue per module
    pub upsell_by_module: BTreeMap<String, f64>,

    /// Sum of upsell revenue across modules
    pub upsell_revenue: f64,

    /// base_revenue + upsell_revenue
    pub total_revenue: f64,

    pub costs: CostBreakdown,
    pub total_costs: f64,
    pub staffing: Staffing,

    /// total_revenue - total_costs
    pub profit_loss: f64,

    /// Net cash for the period
    pub cash_flow: f64,

    /// Intra-period month-by-month cash: annual billing lands in the first
    /// month, monthly billing and costs spread evenly. Sums to `cash_flow`.
    pub monthly_cash_flows: Vec<f64>,

    /// Running sum of period cash flows
    pub cumulative_cash: f64,

    /// Revenue vs. the per-period share of the annual target, if one is set
    pub target_variance: Option<f64>,

    pub metrics: MetricsSnapshot,
}

/// Complete projection result: one record per period, 0..N-1
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub periods_per_year: u32,
    pub periods: Vec<Period>,
}

impl ProjectionResult {
    /// Summary statistics across the whole horizon
    pub fn summary(&self) -> ProjectionSummary {
        let last = self.periods.last();

        let total_revenue: f64 = self.periods.iter().map(|p| p.total_revenue).sum();
        let total_costs: f64 = self.periods.iter().map(|p| p.total_costs).sum();

        // First period at which cumulative cash turns non-negative
        let break_even_period = self
            .periods
            .iter()
            .position(|p| p.cumulative_cash >= 0.0);

        let peak_funding_need = self
            .periods
            .iter()
            .map(|p| p.cumulative_cash)
            .fold(0.0_f64, f64::min)
            .abs();

        ProjectionSummary {
            total_periods: self.periods.len(),
            final_customers: last.map(|p| p.total_customers).unwrap_or(0.0),
            final_annual_run_rate: last
                .map(|p| p.total_revenue * self.periods_per_year as f64)
                .unwrap_or(0.0),
            total_revenue,
            total_costs,
            cumulative_cash: last.map(|p| p.cumulative_cash).unwrap_or(0.0),
            break_even_period,
            peak_funding_need,
        }
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub total_periods: usize,
    pub final_customers: f64,

    /// Last period's revenue annualized
    pub final_annual_run_rate: f64,

    pub total_revenue: f64,
    pub total_costs: f64,
    pub cumulative_cash: f64,

    /// First period at which cumulative cash is non-negative, if any
    pub break_even_period: Option<usize>,

    /// Deepest cumulative cash deficit over the horizon (0 if never negative)
    pub peak_funding_need: f64,
}
