//! SaaS Forecast CLI
//!
//! Runs a financial projection from a JSON assumptions file (or the built-in
//! default plan) and prints a per-period table plus summary, with optional
//! CSV and JSON export.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use saas_forecast::{Assumptions, ProjectionEngine, ProjectionResult};

#[derive(Parser, Debug)]
#[command(name = "saas_forecast", version, about = "SaaS financial projection engine")]
struct Cli {
    /// Path to a JSON assumptions file; omit to use the built-in default plan
    #[arg(short, long)]
    assumptions: Option<PathBuf>,

    /// Override the number of projection periods
    #[arg(short, long)]
    periods: Option<usize>,

    /// Write per-period results to a CSV file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the full projection to a JSON file
    #[arg(short, long)]
    json: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut assumptions = match &cli.assumptions {
        Some(path) => Assumptions::from_json_path(path)
            .map_err(|e| anyhow::anyhow!("{}", e))
            .with_context(|| format!("loading assumptions from {}", path.display()))?,
        None => Assumptions::default_plan(),
    };

    if let Some(periods) = cli.periods {
        assumptions.horizon.periods = periods;
    }

    let engine = ProjectionEngine::new(assumptions)?;
    let result = engine.run();

    print_table(&result);
    print_summary(&result);

    if let Some(path) = &cli.output {
        write_csv(&result, path)
            .with_context(|| format!("writing CSV to {}", path.display()))?;
        println!("\nPer-period results written to: {}", path.display());
    }

    if let Some(path) = &cli.json {
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(file, &result)?;
        println!("Full projection written to: {}", path.display());
    }

    Ok(())
}

fn print_table(result: &ProjectionResult) {
    println!("Projection Results ({} periods):", result.periods.len());
    println!(
        "{:>8} {:>10} {:>12} {:>10} {:>12} {:>10} {:>12} {:>12} {:>8}",
        "Period", "Customers", "Revenue", "Upsell", "Costs", "Staff", "P&L", "Cash", "NRR"
    );
    println!("{}", "-".repeat(102));

    for period in &result.periods {
        println!(
            "{:>8} {:>10.1} {:>12.2} {:>10.2} {:>12.2} {:>10} {:>12.2} {:>12.2} {:>8}",
            period.label,
            period.total_customers,
            period.total_revenue,
            period.upsell_revenue,
            period.total_costs,
            period.staffing.total(),
            period.profit_loss,
            period.cumulative_cash,
            fmt_opt(period.metrics.nrr, 3),
        );
    }
}

fn print_summary(result: &ProjectionResult) {
    let summary = result.summary();
    println!("\nSummary:");
    println!("  Total Periods: {}", summary.total_periods);
    println!("  Final Customers: {:.1}", summary.final_customers);
    println!("  Final Annual Run Rate: {:.2}", summary.final_annual_run_rate);
    println!("  Total Revenue: {:.2}", summary.total_revenue);
    println!("  Total Costs: {:.2}", summary.total_costs);
    println!("  Cumulative Cash: {:.2}", summary.cumulative_cash);
    match summary.break_even_period {
        Some(index) => println!("  Break-even Period: {}", index),
        None => println!("  Break-even Period: not reached"),
    }
    println!("  Peak Funding Need: {:.2}", summary.peak_funding_need);

    if let Some(last) = result.periods.last() {
        println!("\nFinal-period metrics:");
        println!("  ARPU (annual): {}", fmt_opt(last.metrics.arpu, 2));
        println!("  Weighted churn (monthly): {:.4}", last.metrics.weighted_churn);
        println!("  LTV: {}", fmt_opt(last.metrics.ltv, 2));
        println!("  LTV/CAC: {}", fmt_opt(last.metrics.ltv_cac_ratio, 2));
        println!("  CAC payback (months): {}", fmt_opt(last.metrics.cac_payback_months, 1));
        println!("  Rule of 40: {}", fmt_opt(last.metrics.rule_of_40, 1));
    }
}

fn write_csv(result: &ProjectionResult, path: &std::path::Path) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record([
        "period",
        "label",
        "total_customers",
        "base_revenue",
        "upsell_revenue",
        "total_revenue",
        "salaries",
        "technical",
        "marketing",
        "total_costs",
        "headcount",
        "profit_loss",
        "cash_flow",
        "cumulative_cash",
        "target_variance",
        "arpu",
        "weighted_churn",
        "ltv",
        "ltv_cac_ratio",
        "cac_payback_months",
        "nrr",
        "rule_of_40",
    ])?;

    for period in &result.periods {
        writer.write_record([
            period.index.to_string(),
            period.label.clone(),
            format!("{:.4}", period.total_customers),
            format!("{:.2}", period.base_revenue),
            format!("{:.2}", period.upsell_revenue),
            format!("{:.2}", period.total_revenue),
            format!("{:.2}", period.costs.salaries),
            format!("{:.2}", period.costs.technical),
            format!("{:.2}", period.costs.marketing),
            format!("{:.2}", period.total_costs),
            period.staffing.total().to_string(),
            format!("{:.2}", period.profit_loss),
            format!("{:.2}", period.cash_flow),
            format!("{:.2}", period.cumulative_cash),
            fmt_opt(period.target_variance, 2),
            fmt_opt(period.metrics.arpu, 2),
            format!("{:.6}", period.metrics.weighted_churn),
            fmt_opt(period.metrics.ltv, 2),
            fmt_opt(period.metrics.ltv_cac_ratio, 3),
            fmt_opt(period.metrics.cac_payback_months, 2),
            fmt_opt(period.metrics.nrr, 4),
            fmt_opt(period.metrics.rule_of_40, 2),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Render an optional metric, using "n/a" when it is undefined
fn fmt_opt(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => "n/a".to_string(),
    }
}
