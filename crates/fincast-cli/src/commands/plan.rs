use clap::Args;
use serde_json::Value;

use fincast_core::PlanningHorizon;

use crate::commands::{build_engine, load_metrics, parse_kind};

/// Arguments for full plan construction
#[derive(Args)]
pub struct PlanArgs {
    /// Path to JSON input file (array of metric records)
    #[arg(long)]
    pub input: Option<String>,

    /// Plan name
    #[arg(long, default_value = "Financial plan")]
    pub name: String,

    /// Planning horizon: monthly, quarterly, yearly, multi_year
    #[arg(long, default_value = "yearly")]
    pub horizon: String,

    /// Projection length in months
    #[arg(long, default_value_t = 12)]
    pub months: usize,

    /// RNG seed for reproducible scenario adjustments
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Arguments for plan-plus-report rendering
#[derive(Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub plan: PlanArgs,
}

pub fn run_plan(args: PlanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let records = load_metrics(&args.input)?;
    let horizon: PlanningHorizon = parse_kind(&args.horizon, "horizon")?;

    let mut engine = build_engine(args.seed, records);
    let plan = engine.create_financial_plan(&args.name, horizon, args.months)?;
    Ok(serde_json::to_value(plan)?)
}

pub fn run_report(args: ReportArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let records = load_metrics(&args.plan.input)?;
    let horizon: PlanningHorizon = parse_kind(&args.plan.horizon, "horizon")?;

    let mut engine = build_engine(args.plan.seed, records);
    let plan = engine.create_financial_plan(&args.plan.name, horizon, args.plan.months)?;
    let report = engine.planning_report(plan.plan_id)?;
    Ok(serde_json::to_value(report)?)
}
