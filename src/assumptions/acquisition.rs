//! Sales capacity and conversion funnel configuration

use serde::{Deserialize, Serialize};

/// One acquisition channel through the two-stage conversion funnel.
///
/// All time figures are in hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunnelChannel {
    pub name: String,

    /// Fraction of total sales capacity routed to this channel
    pub capacity_share: f64,

    /// Sales time consumed per prospect entering the funnel
    pub hours_per_prospect: f64,

    /// First-meeting to second-meeting conversion rate
    pub stage1_rate: f64,

    /// Second-meeting to paying-client conversion rate
    pub stage2_rate: f64,
}

/// Acquisition assumptions: funnel channels plus the sales-capacity and
/// cost-per-client figures the stepper and metrics consume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcquisitionAssumptions {
    pub channels: Vec<FunnelChannel>,

    /// Selling hours available per sales rep per week
    pub meeting_hours_per_week_per_rep: f64,

    /// Blended acquisition cost per new customer
    pub cac_per_client: f64,
}

impl AcquisitionAssumptions {
    /// Total sales capacity in hours for one period
    pub fn capacity_hours(&self, sales_headcount: u32, weeks_per_period: f64) -> f64 {
        sales_headcount as f64 * self.meeting_hours_per_week_per_rep * weeks_per_period
    }
}
