//! Business assumptions: segments, upsells, costs, growth, acquisition, horizon

mod acquisition;
mod costs;
mod segments;
mod upsell;

pub use acquisition::{AcquisitionAssumptions, FunnelChannel};
pub use costs::{CostModel, MarketingChannel, RoleSalary, SalaryCosts, TechnicalCostItem};
pub use segments::Segment;
pub use upsell::{UpsellModule, UpsellPrice};

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Organic growth and churn-ramp assumptions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthAssumptions {
    /// Annual organic growth rate applied multiplicatively to each segment
    pub organic_annual_rate: f64,

    /// Periods over which segment churn interpolates from initial to final
    #[serde(default = "default_churn_ramp")]
    pub churn_ramp_periods: u32,
}

fn default_churn_ramp() -> u32 {
    8
}

/// Projection horizon and period geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Horizon {
    /// Number of periods to project, including period 0
    pub periods: usize,

    /// Periods per year (4 = quarterly, 12 = monthly); must divide 12
    pub periods_per_year: u32,

    /// Calendar date of the first period, used only for labelling
    #[serde(default = "default_start")]
    pub start: NaiveDate,
}

fn default_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 1).expect("valid date")
}

impl Horizon {
    pub fn months_per_period(&self) -> f64 {
        12.0 / self.periods_per_year as f64
    }

    pub fn weeks_per_period(&self) -> f64 {
        52.0 / self.periods_per_year as f64
    }

    /// Human label for a period: "Q3 2026" at quarterly granularity,
    /// "2026-03" at monthly, "FY2026" at annual.
    pub fn label(&self, period_index: usize) -> String {
        let month_offset = period_index as u32 * (12 / self.periods_per_year);
        let total_months = self.start.month0() + month_offset;
        let year = self.start.year() + (total_months / 12) as i32;
        let month = total_months % 12 + 1;

        match self.periods_per_year {
            1 => format!("FY{}", year),
            4 => format!("Q{} {}", (month - 1) / 3 + 1, year),
            12 => format!("{}-{:02}", year, month),
            ppy => format!("{} P{}", year, period_index as u32 % ppy + 1),
        }
    }
}

/// Full assumptions snapshot consumed by the projection engine.
///
/// One immutable snapshot per run; edits happen on a cloned value through
/// plain field assignment. Maps are ordered so serialization is
/// deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assumptions {
    pub segments: BTreeMap<String, Segment>,
    pub upsell_modules: Vec<UpsellModule>,
    pub costs: CostModel,
    pub growth: GrowthAssumptions,
    pub acquisition: AcquisitionAssumptions,
    pub horizon: Horizon,

    /// Annual revenue target, used only for a per-period variance figure
    #[serde(default)]
    pub target_revenue: Option<f64>,
}

impl Assumptions {
    /// Load assumptions from a JSON file and validate them
    pub fn from_json_path(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let text = std::fs::read_to_string(path)?;
        let assumptions: Assumptions = serde_json::from_str(&text)?;
        assumptions.validate()?;
        Ok(assumptions)
    }

    /// Check every field against its allowed range. Returns the first
    /// violation found, naming the offending field.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.segments.is_empty() {
            return Err(ModelError::invalid("segments", "at least one segment is required"));
        }

        for (name, segment) in &self.segments {
            let field = |suffix: &str| format!("segments.{}.{}", name, suffix);
            check_non_negative(&field("monthly_price"), segment.monthly_price)?;
            check_non_negative(&field("initial_count"), segment.initial_count)?;
            check_fraction(&field("yearly_discount"), segment.yearly_discount)?;
            check_fraction(&field("annual_payment_rate"), segment.annual_payment_rate)?;
            check_fraction(&field("initial_churn"), segment.initial_churn)?;
            check_fraction(&field("final_churn"), segment.final_churn)?;
        }

        for module in &self.upsell_modules {
            let field = |suffix: &str| format!("upsell_modules.{}.{}", module.name, suffix);
            check_non_negative(&field("price"), module.price.amount())?;
            for (segment, rate) in &module.adoption_rate_by_segment {
                check_fraction(&field(&format!("adoption_rate_by_segment.{}", segment)), *rate)?;
                if !self.segments.contains_key(segment) {
                    return Err(ModelError::invalid(
                        field("adoption_rate_by_segment"),
                        format!("unknown segment '{}'", segment),
                    ));
                }
            }
        }

        for (role, salary) in [
            ("founder", &self.costs.salaries.founder),
            ("development", &self.costs.salaries.development),
            ("sales", &self.costs.salaries.sales),
        ] {
            check_non_negative(&format!("costs.salaries.{}.annual", role), salary.annual)?;
            if salary.add_per_clients == Some(0) {
                return Err(ModelError::invalid(
                    format!("costs.salaries.{}.add_per_clients", role),
                    "threshold must be at least 1",
                ));
            }
        }

        for item in &self.costs.technical {
            check_non_negative(&format!("costs.technical.{}.annual", item.name), item.annual)?;
            check_non_negative(
                &format!("costs.technical.{}.escalation_rate", item.name),
                item.escalation_rate,
            )?;
        }

        for channel in &self.costs.marketing {
            check_non_negative(
                &format!("costs.marketing.{}.annual_spend", channel.name),
                channel.annual_spend,
            )?;
        }

        if self.growth.organic_annual_rate <= -1.0 || !self.growth.organic_annual_rate.is_finite() {
            return Err(ModelError::invalid(
                "growth.organic_annual_rate",
                "must be a finite rate greater than -100%",
            ));
        }
        if self.growth.churn_ramp_periods == 0 {
            return Err(ModelError::invalid(
                "growth.churn_ramp_periods",
                "ramp must span at least one period",
            ));
        }

        let mut share_sum = 0.0;
        for channel in &self.acquisition.channels {
            let field = |suffix: &str| format!("acquisition.channels.{}.{}", channel.name, suffix);
            check_fraction(&field("capacity_share"), channel.capacity_share)?;
            check_fraction(&field("stage1_rate"), channel.stage1_rate)?;
            check_fraction(&field("stage2_rate"), channel.stage2_rate)?;
            if channel.hours_per_prospect <= 0.0 || !channel.hours_per_prospect.is_finite() {
                return Err(ModelError::invalid(
                    field("hours_per_prospect"),
                    "must be a positive number of hours",
                ));
            }
            share_sum += channel.capacity_share;
        }
        if share_sum > 1.0 + 1e-9 {
            return Err(ModelError::invalid(
                "acquisition.channels",
                format!("capacity shares sum to {:.4}, must not exceed 1", share_sum),
            ));
        }
        check_non_negative(
            "acquisition.meeting_hours_per_week_per_rep",
            self.acquisition.meeting_hours_per_week_per_rep,
        )?;
        check_non_negative("acquisition.cac_per_client", self.acquisition.cac_per_client)?;

        if self.horizon.periods == 0 {
            return Err(ModelError::invalid("horizon.periods", "horizon must not be empty"));
        }
        if self.horizon.periods_per_year == 0 || 12 % self.horizon.periods_per_year != 0 {
            return Err(ModelError::invalid(
                "horizon.periods_per_year",
                "must divide 12 (1, 2, 3, 4, 6 or 12)",
            ));
        }

        if let Some(target) = self.target_revenue {
            check_non_negative("target_revenue", target)?;
        }

        Ok(())
    }

    /// Built-in default plan: two association tiers, four local-authority
    /// packs, four upsell modules, and a two-channel acquisition funnel.
    pub fn default_plan() -> Self {
        let mut segments = BTreeMap::new();
        segments.insert(
            "small_associations".to_string(),
            Segment {
                monthly_price: 49.0,
                yearly_discount: 0.10,
                initial_count: 50.0,
                annual_payment_rate: 0.3,
                initial_churn: 0.02,
                final_churn: 0.001,
            },
        );
        segments.insert(
            "large_associations".to_string(),
            Segment {
                monthly_price: 99.0,
                yearly_discount: 0.15,
                initial_count: 20.0,
                annual_payment_rate: 0.5,
                initial_churn: 0.015,
                final_churn: 0.0005,
            },
        );

        // Local-authority packs: fixed yearly price, always billed annually
        for (pack, price, count) in [
            ("authority_pack_10", 299.0, 5.0),
            ("authority_pack_20", 499.0, 3.0),
            ("authority_pack_50", 999.0, 2.0),
            ("authority_pack_100", 1_499.0, 1.0),
        ] {
            segments.insert(
                pack.to_string(),
                Segment {
                    monthly_price: price / 12.0,
                    yearly_discount: 0.0,
                    initial_count: count,
                    annual_payment_rate: 1.0,
                    initial_churn: 0.01,
                    final_churn: 0.0003,
                },
            );
        }

        let pack_adoption: BTreeMap<String, f64> = [
            ("authority_pack_10", 0.3),
            ("authority_pack_20", 0.3),
            ("authority_pack_50", 0.3),
            ("authority_pack_100", 0.3),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let assoc_adoption = |small: f64, large: f64| -> BTreeMap<String, f64> {
            [
                ("small_associations".to_string(), small),
                ("large_associations".to_string(), large),
            ]
            .into_iter()
            .collect()
        };

        let upsell_modules = vec![
            UpsellModule {
                name: "mutualization".to_string(),
                activation_period: 1,
                price: UpsellPrice::Yearly(299.0),
                adoption_rate_by_segment: pack_adoption,
            },
            UpsellModule {
                name: "ai_assistant".to_string(),
                activation_period: 2,
                price: UpsellPrice::Monthly(29.0),
                adoption_rate_by_segment: assoc_adoption(0.2, 0.3),
            },
            UpsellModule {
                name: "communication".to_string(),
                activation_period: 3,
                price: UpsellPrice::Monthly(49.0),
                adoption_rate_by_segment: assoc_adoption(0.15, 0.25),
            },
            UpsellModule {
                name: "subsidies".to_string(),
                activation_period: 4,
                price: UpsellPrice::Yearly(499.0),
                adoption_rate_by_segment: assoc_adoption(0.1, 0.2),
            },
        ];

        let costs = CostModel {
            salaries: SalaryCosts {
                founder: RoleSalary {
                    annual: 60_000.0,
                    add_per_clients: None,
                },
                development: RoleSalary {
                    annual: 45_000.0,
                    add_per_clients: Some(200),
                },
                sales: RoleSalary {
                    annual: 40_000.0,
                    add_per_clients: Some(150),
                },
            },
            technical: vec![
                TechnicalCostItem {
                    name: "hosting".to_string(),
                    annual: 2_000.0,
                    escalation_rate: 0.10,
                },
                TechnicalCostItem {
                    name: "domain".to_string(),
                    annual: 100.0,
                    escalation_rate: 0.0,
                },
                TechnicalCostItem {
                    name: "internal_tools".to_string(),
                    annual: 1_000.0,
                    escalation_rate: 0.05,
                },
                TechnicalCostItem {
                    name: "security".to_string(),
                    annual: 2_000.0,
                    escalation_rate: 0.05,
                },
            ],
            marketing: vec![
                MarketingChannel {
                    name: "email".to_string(),
                    annual_spend: 6_000.0,
                },
                MarketingChannel {
                    name: "forums".to_string(),
                    annual_spend: 4_000.0,
                },
                MarketingChannel {
                    name: "partnerships".to_string(),
                    annual_spend: 24_000.0,
                },
            ],
        };

        let acquisition = AcquisitionAssumptions {
            channels: vec![
                FunnelChannel {
                    name: "webinar".to_string(),
                    capacity_share: 0.3,
                    hours_per_prospect: 0.25,
                    stage1_rate: 0.2,
                    stage2_rate: 0.4,
                },
                FunnelChannel {
                    name: "video_call".to_string(),
                    capacity_share: 0.7,
                    hours_per_prospect: 1.0,
                    stage1_rate: 0.5,
                    stage2_rate: 0.6,
                },
            ],
            meeting_hours_per_week_per_rep: 8.0,
            cac_per_client: 500.0,
        };

        Self {
            segments,
            upsell_modules,
            costs,
            growth: GrowthAssumptions {
                organic_annual_rate: 0.10,
                churn_ramp_periods: 8,
            },
            acquisition,
            horizon: Horizon {
                periods: 12,
                periods_per_year: 4,
                start: default_start(),
            },
            target_revenue: Some(500_000.0),
        }
    }
}

fn check_non_negative(field: &str, value: f64) -> Result<(), ModelError> {
    if value < 0.0 || !value.is_finite() {
        Err(ModelError::invalid(field, format!("must be non-negative, got {}", value)))
    } else {
        Ok(())
    }
}

fn check_fraction(field: &str, value: f64) -> Result<(), ModelError> {
    if !(0.0..=1.0).contains(&value) || !value.is_finite() {
        Err(ModelError::invalid(field, format!("must lie in [0, 1], got {}", value)))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_plan_is_valid() {
        assert!(Assumptions::default_plan().validate().is_ok());
    }

    #[test]
    fn test_negative_price_rejected() {
        let mut assumptions = Assumptions::default_plan();
        assumptions
            .segments
            .get_mut("small_associations")
            .unwrap()
            .monthly_price = -1.0;

        let err = assumptions.validate().unwrap_err();
        assert!(err.to_string().contains("small_associations.monthly_price"));
    }

    #[test]
    fn test_billing_mix_outside_unit_interval_rejected() {
        let mut assumptions = Assumptions::default_plan();
        assumptions
            .segments
            .get_mut("large_associations")
            .unwrap()
            .annual_payment_rate = 1.2;

        assert!(assumptions.validate().is_err());
    }

    #[test]
    fn test_zero_length_horizon_rejected() {
        let mut assumptions = Assumptions::default_plan();
        assumptions.horizon.periods = 0;
        assert!(assumptions.validate().is_err());
    }

    #[test]
    fn test_periods_per_year_must_divide_twelve() {
        let mut assumptions = Assumptions::default_plan();
        assumptions.horizon.periods_per_year = 5;
        assert!(assumptions.validate().is_err());
    }

    #[test]
    fn test_capacity_shares_must_not_exceed_one() {
        let mut assumptions = Assumptions::default_plan();
        assumptions.acquisition.channels[0].capacity_share = 0.9;
        assert!(assumptions.validate().is_err());
    }

    #[test]
    fn test_adoption_must_reference_known_segment() {
        let mut assumptions = Assumptions::default_plan();
        assumptions.upsell_modules[0]
            .adoption_rate_by_segment
            .insert("nonexistent".to_string(), 0.5);

        let err = assumptions.validate().unwrap_err();
        assert!(err.to_string().contains("unknown segment"));
    }

    #[test]
    fn test_quarterly_labels() {
        let horizon = Horizon {
            periods: 12,
            periods_per_year: 4,
            start: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        };

        assert_eq!(horizon.label(0), "Q1 2026");
        assert_eq!(horizon.label(3), "Q4 2026");
        assert_eq!(horizon.label(4), "Q1 2027");
        assert_eq!(horizon.label(11), "Q4 2028");
    }

    #[test]
    fn test_monthly_labels() {
        let horizon = Horizon {
            periods: 24,
            periods_per_year: 12,
            start: NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
        };

        assert_eq!(horizon.label(0), "2026-07");
        assert_eq!(horizon.label(6), "2027-01");
    }

    #[test]
    fn test_json_round_trip() {
        let assumptions = Assumptions::default_plan();
        let json = serde_json::to_string(&assumptions).unwrap();
        let back: Assumptions = serde_json::from_str(&json).unwrap();
        assert_eq!(assumptions, back);
    }
}
