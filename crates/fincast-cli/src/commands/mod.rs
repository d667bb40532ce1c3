pub mod forecast;
pub mod plan;

use serde::de::DeserializeOwned;
use serde_json::Value;

use fincast_core::metrics::store::MetricRecord;
use fincast_core::FinancialPlanningEngine;

use crate::input;

/// Load historical metrics from the --input file or piped stdin.
pub fn load_metrics(
    input_path: &Option<String>,
) -> Result<Vec<MetricRecord>, Box<dyn std::error::Error>> {
    if let Some(path) = input_path {
        input::file::read_json(path)
    } else if let Some(data) = input::stdin::read_stdin()? {
        Ok(serde_json::from_value(data)?)
    } else {
        Err("--input <file.json> or piped stdin required (array of metric records)".into())
    }
}

/// Parse a snake_case enum name (category, scenario, horizon) via serde.
pub fn parse_kind<T: DeserializeOwned>(
    raw: &str,
    what: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    serde_json::from_value(Value::String(raw.to_string()))
        .map_err(|_| format!("unknown {}: '{}'", what, raw).into())
}

/// Engine seeded for reproducible runs, entropy-seeded otherwise.
pub fn build_engine(
    seed: Option<u64>,
    records: Vec<MetricRecord>,
) -> FinancialPlanningEngine {
    let mut engine = match seed {
        Some(seed) => FinancialPlanningEngine::with_seed(seed),
        None => FinancialPlanningEngine::new(),
    };
    engine.add_historical_data(records);
    engine
}
