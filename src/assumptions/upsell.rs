//! Optional add-on modules priced per month or per year

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Pricing basis for an upsell module
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsellPrice {
    /// Price per adopting customer per month
    Monthly(f64),
    /// Price per adopting customer per year
    Yearly(f64),
}

impl UpsellPrice {
    pub fn amount(&self) -> f64 {
        match self {
            UpsellPrice::Monthly(p) | UpsellPrice::Yearly(p) => *p,
        }
    }
}

/// An optional add-on with a per-segment adoption rate and an activation
/// period. Modules are static configuration; their revenue is recomputed
/// every period from current segment counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpsellModule {
    pub name: String,

    /// First period (0-indexed) in which the module generates revenue
    pub activation_period: usize,

    pub price: UpsellPrice,

    /// Adoption rate keyed by segment name; segments without an entry do not
    /// adopt the module
    pub adoption_rate_by_segment: BTreeMap<String, f64>,
}

impl UpsellModule {
    /// Whether the module bills once per year (collected in a period's first
    /// month) rather than monthly
    pub fn bills_annually(&self) -> bool {
        matches!(self.price, UpsellPrice::Yearly(_))
    }

    /// Revenue for one period from end-of-period segment counts.
    /// Contributes zero before the activation period.
    pub fn period_revenue(
        &self,
        period_index: usize,
        segment_counts: &BTreeMap<String, f64>,
        periods_per_year: u32,
        months_per_period: f64,
    ) -> f64 {
        if period_index < self.activation_period {
            return 0.0;
        }

        let adopters: f64 = self
            .adoption_rate_by_segment
            .iter()
            .map(|(segment, rate)| segment_counts.get(segment).copied().unwrap_or(0.0) * rate)
            .sum();

        match self.price {
            UpsellPrice::Monthly(price) => adopters * price * months_per_period,
            UpsellPrice::Yearly(price) => adopters * price / periods_per_year as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn counts(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn test_module() -> UpsellModule {
        UpsellModule {
            name: "ai_assistant".to_string(),
            activation_period: 2,
            price: UpsellPrice::Monthly(29.0),
            adoption_rate_by_segment: [("small".to_string(), 0.2), ("large".to_string(), 0.3)]
                .into_iter()
                .collect(),
        }
    }

    #[test]
    fn test_zero_before_activation() {
        let module = test_module();
        let segment_counts = counts(&[("small", 100.0), ("large", 40.0)]);

        assert_eq!(module.period_revenue(0, &segment_counts, 4, 3.0), 0.0);
        assert_eq!(module.period_revenue(1, &segment_counts, 4, 3.0), 0.0);
        assert!(module.period_revenue(2, &segment_counts, 4, 3.0) > 0.0);
    }

    #[test]
    fn test_monthly_price_over_quarter() {
        let module = test_module();
        let segment_counts = counts(&[("small", 100.0), ("large", 40.0)]);

        // (100 * 0.2 + 40 * 0.3) adopters * 29/month * 3 months
        let expected = (100.0 * 0.2 + 40.0 * 0.3) * 29.0 * 3.0;
        assert_relative_eq!(module.period_revenue(2, &segment_counts, 4, 3.0), expected);
    }

    #[test]
    fn test_yearly_price_prorated() {
        let module = UpsellModule {
            price: UpsellPrice::Yearly(299.0),
            ..test_module()
        };
        let segment_counts = counts(&[("small", 100.0), ("large", 40.0)]);

        let expected = (100.0 * 0.2 + 40.0 * 0.3) * 299.0 / 4.0;
        assert_relative_eq!(module.period_revenue(5, &segment_counts, 4, 3.0), expected);
    }

    #[test]
    fn test_unknown_segments_ignored() {
        let module = test_module();
        let segment_counts = counts(&[("other", 500.0)]);

        assert_eq!(module.period_revenue(4, &segment_counts, 4, 3.0), 0.0);
    }
}
