use clap::Args;
use serde_json::Value;

use fincast_core::{ForecastCategory, ScenarioKind};

use crate::commands::{build_engine, load_metrics, parse_kind};

/// Arguments for single-category forecasting
#[derive(Args)]
pub struct ForecastArgs {
    /// Path to JSON input file (array of metric records)
    #[arg(long)]
    pub input: Option<String>,

    /// Forecast category: revenue, expenses, cash_flow, growth
    #[arg(long)]
    pub category: String,

    /// Scenario: optimistic, realistic, pessimistic
    #[arg(long, default_value = "realistic")]
    pub scenario: String,

    /// Forecast horizon in months
    #[arg(long, default_value_t = 12)]
    pub months: usize,

    /// RNG seed for reproducible scenario adjustments
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn run_forecast(args: ForecastArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let records = load_metrics(&args.input)?;
    let category: ForecastCategory = parse_kind(&args.category, "category")?;
    let scenario: ScenarioKind = parse_kind(&args.scenario, "scenario")?;

    let mut engine = build_engine(args.seed, records);
    let forecast = engine.generate_forecast(category, scenario, args.months)?;
    Ok(serde_json::to_value(forecast)?)
}
