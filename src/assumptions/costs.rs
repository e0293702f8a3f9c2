//! Role-based salary costs, technical infrastructure, and marketing spend

use serde::{Deserialize, Serialize};

/// Salary assumptions for one role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleSalary {
    /// Annual gross cost of one employee in the role
    pub annual: f64,

    /// One additional employee per this many customers. `None` pins the role
    /// at a single employee (the founder).
    #[serde(default)]
    pub add_per_clients: Option<u32>,
}

impl RoleSalary {
    /// Headcount as a step function of the customer base: one base employee
    /// plus one more per `add_per_clients` customers.
    pub fn headcount_for(&self, total_customers: f64) -> u32 {
        match self.add_per_clients {
            Some(threshold) => 1 + (total_customers / threshold as f64).floor() as u32,
            None => 1,
        }
    }
}

/// Salary costs for the three staffed roles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryCosts {
    pub founder: RoleSalary,
    pub development: RoleSalary,
    pub sales: RoleSalary,
}

/// A fixed technical cost line, optionally escalating each year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalCostItem {
    pub name: String,

    /// Annual cost in year 0
    pub annual: f64,

    /// Fractional increase per full elapsed year (0.10 = +10%/year)
    #[serde(default)]
    pub escalation_rate: f64,
}

/// A marketing/acquisition channel with a flat annual budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketingChannel {
    pub name: String,
    pub annual_spend: f64,
}

/// Full cost structure: salaries by role, technical lines, marketing channels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostModel {
    pub salaries: SalaryCosts,
    pub technical: Vec<TechnicalCostItem>,
    pub marketing: Vec<MarketingChannel>,
}

impl CostModel {
    /// Technical cost for one period. Escalation applies in yearly steps:
    /// `annual * (1 + escalation_rate * floor(period / periods_per_year))`.
    pub fn technical_for_period(&self, period_index: usize, periods_per_year: u32) -> f64 {
        let elapsed_years = (period_index / periods_per_year as usize) as f64;
        let annual: f64 = self
            .technical
            .iter()
            .map(|item| item.annual * (1.0 + item.escalation_rate * elapsed_years))
            .sum();
        annual / periods_per_year as f64
    }

    /// Marketing spend for one period (flat across the year)
    pub fn marketing_for_period(&self, periods_per_year: u32) -> f64 {
        let annual: f64 = self.marketing.iter().map(|c| c.annual_spend).sum();
        annual / periods_per_year as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn test_costs() -> CostModel {
        CostModel {
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
            ],
            marketing: vec![MarketingChannel {
                name: "email".to_string(),
                annual_spend: 6_000.0,
            }],
        }
    }

    #[test]
    fn test_headcount_step_function() {
        let costs = test_costs();

        assert_eq!(costs.salaries.founder.headcount_for(10_000.0), 1);
        assert_eq!(costs.salaries.development.headcount_for(0.0), 1);
        assert_eq!(costs.salaries.development.headcount_for(199.0), 1);
        assert_eq!(costs.salaries.development.headcount_for(200.0), 2);
        assert_eq!(costs.salaries.development.headcount_for(650.0), 4);
        assert_eq!(costs.salaries.sales.headcount_for(300.0), 3);
    }

    #[test]
    fn test_headcount_monotone_in_customers() {
        let role = RoleSalary {
            annual: 45_000.0,
            add_per_clients: Some(150),
        };

        let mut last = 0;
        for customers in (0..2_000).step_by(7) {
            let hc = role.headcount_for(customers as f64);
            assert!(hc >= last);
            last = hc;
        }
    }

    #[test]
    fn test_technical_escalation_yearly_steps() {
        let costs = test_costs();

        // Year 0: (2000 + 100) / 4 per quarter
        assert_relative_eq!(costs.technical_for_period(0, 4), 2_100.0 / 4.0);
        assert_relative_eq!(costs.technical_for_period(3, 4), 2_100.0 / 4.0);
        // Year 1: hosting escalates 10%, domain does not
        assert_relative_eq!(costs.technical_for_period(4, 4), (2_200.0 + 100.0) / 4.0);
        // Year 2
        assert_relative_eq!(costs.technical_for_period(8, 4), (2_400.0 + 100.0) / 4.0);
    }

    #[test]
    fn test_marketing_flat_per_period() {
        let costs = test_costs();
        assert_relative_eq!(costs.marketing_for_period(4), 1_500.0);
    }
}
