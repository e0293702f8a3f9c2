//! Core projection engine: period-0 initialization and the period recurrence

use std::collections::BTreeMap;

use log::{info, warn};

use super::funnel;
use super::metrics::{self, MetricsSnapshot};
use super::period::{CostBreakdown, Period, ProjectionResult, SegmentPeriod, Staffing};
use crate::assumptions::Assumptions;
use crate::error::ModelError;

/// Main projection engine.
///
/// Holds one validated assumptions snapshot. Each `run` walks the horizon
/// period by period and returns a fresh, immutable result; runs are
/// deterministic and side-effect free, so concurrent runs over different
/// assumptions do not interfere.
pub struct ProjectionEngine {
    assumptions: Assumptions,
}

impl ProjectionEngine {
    /// Create an engine, rejecting malformed assumptions before any period
    /// is computed
    pub fn new(assumptions: Assumptions) -> Result<Self, ModelError> {
        assumptions.validate()?;
        Ok(Self { assumptions })
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    /// Run the full projection over the configured horizon
    pub fn run(&self) -> ProjectionResult {
        let horizon = &self.assumptions.horizon;
        info!(
            "projecting {} periods ({} per year)",
            horizon.periods, horizon.periods_per_year
        );

        let mut periods = Vec::with_capacity(horizon.periods);
        periods.push(self.initialize());

        for index in 1..horizon.periods {
            let next = self.step_period(&periods[index - 1], index);
            periods.push(next);
        }

        ProjectionResult {
            periods_per_year: horizon.periods_per_year,
            periods,
        }
    }

    /// Build period 0 from the initial distribution: no churn, growth, or
    /// acquisition applied yet
    fn initialize(&self) -> Period {
        let a = &self.assumptions;
        let ppy = a.horizon.periods_per_year;
        let mpp = a.horizon.months_per_period();

        let mut segments = BTreeMap::new();
        for (name, segment) in &a.segments {
            let count = segment.initial_count;
            segments.insert(
                name.clone(),
                SegmentPeriod {
                    start_count: count,
                    churn_rate: segment.churn_rate(0, a.growth.churn_ramp_periods),
                    churned: 0.0,
                    organic_added: 0.0,
                    acquired: 0.0,
                    end_count: count,
                    revenue: segment.period_revenue(count, ppy, mpp),
                },
            );
        }

        self.assemble_period(0, segments, None)
    }

    /// The central recurrence: evolve counts under churn, organic growth,
    /// and funnel acquisition, then derive revenue, costs, and metrics.
    /// Depends only on the immediately preceding period plus static
    /// assumptions.
    fn step_period(&self, previous: &Period, index: usize) -> Period {
        let a = &self.assumptions;
        let ppy = a.horizon.periods_per_year;
        let mpp = a.horizon.months_per_period();

        // Annual organic rate converted to a per-period multiplier
        let organic_period_rate =
            (1.0 + a.growth.organic_annual_rate).powf(1.0 / ppy as f64) - 1.0;

        // Funnel acquisition from the sales capacity staffed in the prior period
        let capacity = a
            .acquisition
            .capacity_hours(previous.staffing.sales, a.horizon.weeks_per_period());
        let new_clients = funnel::new_clients(capacity, &a.acquisition.channels);

        let prev_total = previous.total_customers;
        if prev_total <= 0.0 && new_clients > 0.0 {
            // New clients mirror the existing mix; with no base there is
            // nothing to attribute them to
            warn!(
                "period {}: dropping {:.2} funnel clients, customer base is empty",
                index, new_clients
            );
        }

        let mut segments = BTreeMap::new();
        for (name, segment) in &a.segments {
            let prev = &previous.segments[name];
            let start_count = prev.end_count;

            let churn_rate = segment.churn_rate(index, a.growth.churn_ramp_periods);
            // Geometric compounding of the monthly rate over the period
            let churned = start_count * (1.0 - (1.0 - churn_rate).powf(mpp));

            let organic_added = start_count * organic_period_rate;

            let acquired = if prev_total > 0.0 {
                new_clients * start_count / prev_total
            } else {
                0.0
            };

            let end_count = (start_count + organic_added + acquired - churned).max(0.0);

            segments.insert(
                name.clone(),
                SegmentPeriod {
                    start_count,
                    churn_rate,
                    churned,
                    organic_added,
                    acquired,
                    end_count,
                    revenue: segment.period_revenue(end_count, ppy, mpp),
                },
            );
        }

        self.assemble_period(index, segments, Some(previous))
    }

    /// Shared tail of initialize/step: upsell, staffing, costs, cash, metrics
    fn assemble_period(
        &self,
        index: usize,
        segments: BTreeMap<String, SegmentPeriod>,
        previous: Option<&Period>,
    ) -> Period {
        let a = &self.assumptions;
        let ppy = a.horizon.periods_per_year;
        let mpp = a.horizon.months_per_period();

        let total_customers: f64 = segments.values().map(|s| s.end_count).sum();
        let base_revenue: f64 = segments.values().map(|s| s.revenue).sum();

        let end_counts: BTreeMap<String, f64> = segments
            .iter()
            .map(|(name, s)| (name.clone(), s.end_count))
            .collect();

        let mut upsell_by_module = BTreeMap::new();
        let mut upsell_revenue = 0.0;
        for module in &a.upsell_modules {
            let revenue = module.period_revenue(index, &end_counts, ppy, mpp);
            upsell_revenue += revenue;
            upsell_by_module.insert(module.name.clone(), revenue);
        }

        let total_revenue = base_revenue + upsell_revenue;

        let staffing = self.staffing_for(total_customers);
        let roles = &a.costs.salaries;
        let salaries = (roles.founder.annual * staffing.founder as f64
            + roles.development.annual * staffing.development as f64
            + roles.sales.annual * staffing.sales as f64)
            / ppy as f64;

        let costs = CostBreakdown {
            salaries,
            technical: a.costs.technical_for_period(index, ppy),
            marketing: a.costs.marketing_for_period(ppy),
        };
        let total_costs = costs.total();

        let profit_loss = total_revenue - total_costs;
        let cash_flow = profit_loss;
        let cumulative_cash = previous.map_or(0.0, |p| p.cumulative_cash) + cash_flow;

        // Month-by-month view of the same cash: annual billing is collected
        // in the period's first month, everything else spreads evenly
        let mut front_loaded: f64 = a
            .segments
            .iter()
            .map(|(name, segment)| segment.annual_billed_revenue(segments[name].end_count, ppy))
            .sum();
        for module in &a.upsell_modules {
            if module.bills_annually() {
                front_loaded += upsell_by_module[&module.name];
            }
        }
        let months = mpp as usize;
        let spread_revenue = (total_revenue - front_loaded) / months as f64;
        let monthly_cost = total_costs / months as f64;
        let mut monthly_cash_flows = vec![spread_revenue - monthly_cost; months];
        monthly_cash_flows[0] += front_loaded;

        let target_variance = a
            .target_revenue
            .map(|target| total_revenue - target / ppy as f64);

        let mut period = Period {
            index,
            label: a.horizon.label(index),
            segments,
            total_customers,
            base_revenue,
            upsell_by_module,
            upsell_revenue,
            total_revenue,
            costs,
            total_costs,
            staffing,
            profit_loss,
            cash_flow,
            monthly_cash_flows,
            cumulative_cash,
            target_variance,
            metrics: MetricsSnapshot::default(),
        };

        period.metrics =
            metrics::derive_metrics(&period, previous, a.acquisition.cac_per_client, ppy);

        // Violations here are stepper bugs, not bad input
        debug_assert!(
            (period.total_revenue - period.base_revenue - period.upsell_revenue).abs() < 1e-9
        );
        debug_assert!(period.segments.values().all(|s| s.end_count >= 0.0));

        period
    }

    /// Headcount per role as a step function of total customers. Founder is
    /// fixed at 1; development and sales each start at 1 and add one per
    /// threshold.
    fn staffing_for(&self, total_customers: f64) -> Staffing {
        let roles = &self.assumptions.costs.salaries;
        Staffing {
            founder: roles.founder.headcount_for(total_customers),
            development: roles.development.headcount_for(total_customers),
            sales: roles.sales.headcount_for(total_customers),
        }
    }
}
