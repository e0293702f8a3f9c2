//! Customer segment definitions and churn interpolation

use serde::{Deserialize, Serialize};

/// A named customer category with pricing, billing mix, and churn assumptions.
///
/// Churn rates are monthly rates. Packaged offerings with a fixed yearly price
/// (e.g. local-authority packs) are expressed as segments with
/// `annual_payment_rate = 1.0` and `monthly_price = pack_price / 12`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Unit price per month
    pub monthly_price: f64,

    /// Discount granted when billed annually
    pub yearly_discount: f64,

    /// Customer count at period 0
    pub initial_count: f64,

    /// Fraction of customers billed annually
    pub annual_payment_rate: f64,

    /// Monthly churn rate at period 0
    pub initial_churn: f64,

    /// Monthly churn rate once the ramp window has elapsed
    pub final_churn: f64,
}

impl Segment {
    /// Annual price with the yearly-billing discount applied
    pub fn yearly_price(&self) -> f64 {
        self.monthly_price * 12.0 * (1.0 - self.yearly_discount)
    }

    /// Monthly churn rate at a given period.
    ///
    /// Linear interpolation from `initial_churn` to `final_churn` over
    /// `ramp_periods`, clamped at the ramp boundary. The result always lies
    /// between the two configured rates.
    pub fn churn_rate(&self, period_index: usize, ramp_periods: u32) -> f64 {
        let progress = (period_index as f64 / ramp_periods as f64).min(1.0);
        self.initial_churn + (self.final_churn - self.initial_churn) * progress
    }

    /// The annually-billed slice of one period's revenue. This portion is
    /// collected in the period's first month (see the engine's monthly
    /// cash-flow split).
    pub fn annual_billed_revenue(&self, count: f64, periods_per_year: u32) -> f64 {
        count * self.annual_payment_rate * self.yearly_price() / periods_per_year as f64
    }

    /// Revenue for one period given a customer count.
    ///
    /// Annual contracts contribute `yearly_price / periods_per_year`, monthly
    /// contracts `monthly_price * months_per_period`. The caller supplies
    /// end-of-period counts; see the engine for the convention.
    pub fn period_revenue(
        &self,
        count: f64,
        periods_per_year: u32,
        months_per_period: f64,
    ) -> f64 {
        self.annual_billed_revenue(count, periods_per_year)
            + count * (1.0 - self.annual_payment_rate) * self.monthly_price * months_per_period
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn test_segment() -> Segment {
        Segment {
            monthly_price: 49.0,
            yearly_discount: 0.1,
            initial_count: 50.0,
            annual_payment_rate: 0.3,
            initial_churn: 0.02,
            final_churn: 0.001,
        }
    }

    #[test]
    fn test_yearly_price_discount() {
        let segment = test_segment();
        assert_relative_eq!(segment.yearly_price(), 49.0 * 12.0 * 0.9);
    }

    #[test]
    fn test_churn_interpolation_endpoints() {
        let segment = test_segment();

        assert_relative_eq!(segment.churn_rate(0, 8), 0.02);
        assert_relative_eq!(segment.churn_rate(4, 8), (0.02 + 0.001) / 2.0);
        assert_relative_eq!(segment.churn_rate(8, 8), 0.001);
    }

    #[test]
    fn test_churn_clamped_past_ramp() {
        let segment = test_segment();

        // Never extrapolated beyond the final rate
        assert_relative_eq!(segment.churn_rate(20, 8), 0.001);
        assert_relative_eq!(segment.churn_rate(100, 8), 0.001);
    }

    #[test]
    fn test_churn_stays_within_bounds() {
        let segment = test_segment();
        let lo = segment.initial_churn.min(segment.final_churn);
        let hi = segment.initial_churn.max(segment.final_churn);

        for t in 0..40 {
            let rate = segment.churn_rate(t, 8);
            assert!(rate >= lo && rate <= hi, "rate {} out of bounds at t={}", rate, t);
        }
    }

    #[test]
    fn test_period_revenue_all_monthly() {
        let segment = Segment {
            annual_payment_rate: 0.0,
            ..test_segment()
        };

        // 100 monthly customers at 49/month over a 3-month quarter
        assert_relative_eq!(segment.period_revenue(100.0, 4, 3.0), 100.0 * 49.0 * 3.0);
    }

    #[test]
    fn test_period_revenue_billing_mix() {
        let segment = test_segment();
        let revenue = segment.period_revenue(100.0, 4, 3.0);

        let expected = 30.0 * segment.yearly_price() / 4.0 + 70.0 * 49.0 * 3.0;
        assert_relative_eq!(revenue, expected);
    }
}
