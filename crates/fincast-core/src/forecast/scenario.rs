use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::forecast::ForecastPoint;
use crate::types::{ForecastCategory, ScenarioKind};

/// Multiplicative factors applied to raw model predictions under a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentFactors {
    pub growth_factor: f64,
    /// Half-width of the uniform random perturbation.
    pub volatility: f64,
    pub market_factor: f64,
}

/// Factors for scenario × category pairs without an explicit table entry.
pub const DEFAULT_FACTORS: AdjustmentFactors = AdjustmentFactors {
    growth_factor: 1.0,
    volatility: 0.1,
    market_factor: 1.0,
};

/// Fixed scenario × category adjustment table.
pub fn adjustment_factors(
    scenario: ScenarioKind,
    category: ForecastCategory,
) -> AdjustmentFactors {
    use ForecastCategory::*;
    use ScenarioKind::*;

    let f = |growth_factor, volatility, market_factor| AdjustmentFactors {
        growth_factor,
        volatility,
        market_factor,
    };
    match (scenario, category) {
        (Optimistic, Revenue) => f(1.25, 0.15, 1.1),
        (Optimistic, Expenses) => f(0.95, 0.10, 0.9),
        (Optimistic, CashFlow) => f(1.20, 0.12, 1.05),
        (Optimistic, Growth) => f(1.30, 0.20, 1.15),
        (Realistic, Revenue) => f(1.0, 0.10, 1.0),
        (Realistic, Expenses) => f(1.0, 0.08, 1.0),
        (Realistic, CashFlow) => f(1.0, 0.10, 1.0),
        (Realistic, Growth) => f(1.0, 0.15, 1.0),
        (Pessimistic, Revenue) => f(0.8, 0.20, 0.9),
        (Pessimistic, Expenses) => f(1.1, 0.15, 1.1),
        (Pessimistic, CashFlow) => f(0.75, 0.18, 0.85),
        (Pessimistic, Growth) => f(0.7, 0.25, 0.8),
        _ => DEFAULT_FACTORS,
    }
}

/// Adjust raw predictions in place for the given scenario:
/// `value = raw * growth * market * (1 + uniform(-volatility, +volatility))`,
/// floored at zero. Each point records the scenario and the factors used.
///
/// The RNG is injected so seeded engines produce reproducible forecasts.
pub fn apply_adjustments(
    points: &mut [ForecastPoint],
    scenario: ScenarioKind,
    category: ForecastCategory,
    rng: &mut StdRng,
) {
    let factors = adjustment_factors(scenario, category);
    for point in points.iter_mut() {
        let adjusted = point.value * factors.growth_factor * factors.market_factor;
        let random_factor = 1.0 + rng.gen_range(-factors.volatility..=factors.volatility);
        point.value = (adjusted * random_factor).max(0.0);
        point.scenario = Some(scenario);
        point.adjustments = Some(factors);
    }
}

/// Qualitative assumptions recorded on every forecast for its scenario.
pub fn scenario_assumptions(scenario: ScenarioKind) -> BTreeMap<String, String> {
    let entries: [(&str, &str); 5] = match scenario {
        ScenarioKind::Optimistic => [
            ("market_growth", "Strong market growth expected"),
            ("competition", "Limited competitive pressure"),
            ("economic_conditions", "Favorable economic environment"),
            ("product_adoption", "Rapid product adoption"),
            ("operational_efficiency", "High operational efficiency gains"),
        ],
        ScenarioKind::Realistic => [
            ("market_growth", "Moderate market growth"),
            ("competition", "Normal competitive environment"),
            ("economic_conditions", "Stable economic conditions"),
            ("product_adoption", "Steady product adoption"),
            ("operational_efficiency", "Gradual efficiency improvements"),
        ],
        ScenarioKind::Pessimistic => [
            ("market_growth", "Slow or declining market growth"),
            ("competition", "Intense competitive pressure"),
            ("economic_conditions", "Challenging economic environment"),
            ("product_adoption", "Slow product adoption"),
            ("operational_efficiency", "Operational challenges expected"),
        ],
    };
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
