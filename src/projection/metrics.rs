//! Derived SaaS health metrics per period

use serde::{Deserialize, Serialize};

use super::period::Period;

/// Derived metrics snapshot for one period.
///
/// Ratios whose denominator is zero are `None` (serialized as `null`,
/// rendered as "n/a"); callers never observe NaN or infinity. This is how a
/// period with no customers or no prior revenue flags itself as "metrics
/// unavailable" without failing the run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Annualized average revenue per customer
    pub arpu: Option<f64>,

    /// Count-weighted average monthly churn across segments; 0 with no customers
    pub weighted_churn: f64,

    /// Acquisition cost per new customer (from assumptions)
    pub cac: f64,

    /// Lifetime value: annualized ARPU over annualized churn
    pub ltv: Option<f64>,

    pub ltv_cac_ratio: Option<f64>,

    /// Months of ARPU needed to recover the CAC
    pub cac_payback_months: Option<f64>,

    /// Net revenue retention vs. the previous period's base revenue
    pub nrr: Option<f64>,

    /// Annualized growth % plus operating margin %
    pub rule_of_40: Option<f64>,

    /// Profit/loss over total revenue
    pub operating_margin: Option<f64>,

    /// Annualized revenue per employee
    pub revenue_per_employee: Option<f64>,
}

/// Derive the metrics snapshot for a period from its own figures and the
/// previous period (None for period 0).
pub fn derive_metrics(
    current: &Period,
    previous: Option<&Period>,
    cac: f64,
    periods_per_year: u32,
) -> MetricsSnapshot {
    let ppy = periods_per_year as f64;
    let customers = current.total_customers;

    let arpu = if customers > 0.0 {
        Some(current.total_revenue * ppy / customers)
    } else {
        None
    };

    let weighted_churn = if customers > 0.0 {
        current
            .segments
            .values()
            .map(|s| s.end_count * s.churn_rate)
            .sum::<f64>()
            / customers
    } else {
        0.0
    };

    // LTV pairs annualized ARPU with annualized monthly churn, so the time
    // units cancel and the result is lifetime revenue per customer
    let ltv = match arpu {
        Some(a) if a > 0.0 && weighted_churn > 0.0 => Some(a / (weighted_churn * 12.0)),
        _ => None,
    };

    let ltv_cac_ratio = match ltv {
        Some(l) if cac > 0.0 => Some(l / cac),
        _ => None,
    };

    let cac_payback_months = match arpu {
        Some(a) if a > 0.0 => Some(cac / (a / 12.0)),
        _ => None,
    };

    let nrr = previous.and_then(|prev| {
        if prev.base_revenue > 0.0 {
            Some((current.base_revenue + current.upsell_revenue) / prev.base_revenue)
        } else {
            None
        }
    });

    let operating_margin = if current.total_revenue > 0.0 {
        Some(current.profit_loss / current.total_revenue)
    } else {
        None
    };

    // Growth is 0 for the opening period and undefined when the prior period
    // had no revenue
    let annualized_growth = match previous {
        None => Some(0.0),
        Some(prev) if prev.total_revenue > 0.0 => {
            let period_growth = current.total_revenue / prev.total_revenue - 1.0;
            Some((1.0 + period_growth).powi(periods_per_year as i32) - 1.0)
        }
        Some(_) => None,
    };

    let rule_of_40 = match (annualized_growth, operating_margin) {
        (Some(growth), Some(margin)) => Some(growth * 100.0 + margin * 100.0),
        _ => None,
    };

    let headcount = current.staffing.total();
    let revenue_per_employee = if customers > 0.0 && headcount > 0 {
        Some(current.total_revenue * ppy / headcount as f64)
    } else {
        None
    };

    MetricsSnapshot {
        arpu,
        weighted_churn,
        cac,
        ltv,
        ltv_cac_ratio,
        cac_payback_months,
        nrr,
        rule_of_40,
        operating_margin,
        revenue_per_employee,
    }
}
