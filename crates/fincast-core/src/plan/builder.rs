use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::forecast::Forecast;
use crate::plan::{FinancialPlan, RiskFactor};
use crate::types::{PlanningHorizon, Rate, RiskSeverity, ScenarioKind};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Budget split as a fraction of average monthly realistic revenue. The
/// fractions deliberately sum to 0.73; the rest is unallocated headroom.
pub const BUDGET_SPLITS: [(&str, Rate); 6] = [
    ("marketing", dec!(0.15)),
    ("sales", dec!(0.10)),
    ("engineering", dec!(0.25)),
    ("operations", dec!(0.08)),
    ("admin", dec!(0.05)),
    ("contingency", dec!(0.10)),
];

/// Negative pessimistic cash-flow months tolerated before the plan carries a
/// cash-flow risk.
pub const NEGATIVE_CASH_FLOW_TOLERANCE: usize = 3;

// ---------------------------------------------------------------------------
// Derivations
// ---------------------------------------------------------------------------

/// Split the realistic scenario's average monthly revenue across the fixed
/// budget categories. Returns an empty map when the realistic scenario is
/// missing or has no projected months.
pub fn derive_budget_allocations(
    scenarios: &BTreeMap<ScenarioKind, Forecast>,
) -> BTreeMap<String, Decimal> {
    let points = match scenarios
        .get(&ScenarioKind::Realistic)
        .and_then(|f| f.predictions.as_combined())
    {
        Some(points) if !points.is_empty() => points,
        _ => return BTreeMap::new(),
    };
    let total: Decimal = points.iter().map(|p| p.revenue).sum();
    let avg_monthly = total / Decimal::from(points.len());
    BUDGET_SPLITS
        .iter()
        .map(|(name, fraction)| (name.to_string(), avg_monthly * fraction))
        .collect()
}

/// Derive KPI targets from the midpoint of the realistic and optimistic
/// total revenue. Both scenarios must be present; otherwise no targets are
/// produced.
pub fn derive_kpi_targets(
    scenarios: &BTreeMap<ScenarioKind, Forecast>,
) -> BTreeMap<String, Decimal> {
    let total_revenue = |kind: ScenarioKind| -> Option<Decimal> {
        scenarios
            .get(&kind)
            .and_then(|f| f.predictions.as_combined())
            .map(|points| points.iter().map(|p| p.revenue).sum())
    };
    let (realistic, optimistic) = match (
        total_revenue(ScenarioKind::Realistic),
        total_revenue(ScenarioKind::Optimistic),
    ) {
        (Some(r), Some(o)) => (r, o),
        _ => return BTreeMap::new(),
    };
    let target = (realistic + optimistic) / dec!(2);

    let mut targets = BTreeMap::new();
    targets.insert("annual_revenue".to_string(), target);
    targets.insert("monthly_revenue".to_string(), target / dec!(12));
    targets.insert("gross_margin".to_string(), dec!(0.70));
    targets.insert("customer_acquisition_cost".to_string(), dec!(100.00));
    targets.insert("customer_lifetime_value".to_string(), dec!(1000.00));
    targets.insert("cash_runway_months".to_string(), dec!(18));
    targets.insert("burn_rate".to_string(), target * dec!(0.8) / dec!(12));
    targets
}

/// Risks carried on every plan, plus a high-severity cash-flow risk when the
/// pessimistic scenario projects more negative cash-flow months than the
/// tolerance.
pub fn identify_risk_factors(scenarios: &BTreeMap<ScenarioKind, Forecast>) -> Vec<RiskFactor> {
    let mut risks = Vec::new();

    let negative_months = scenarios
        .get(&ScenarioKind::Pessimistic)
        .and_then(|f| f.predictions.as_combined())
        .map(|points| points.iter().filter(|p| p.cash_flow < Decimal::ZERO).count())
        .unwrap_or(0);
    if negative_months > NEGATIVE_CASH_FLOW_TOLERANCE {
        risks.push(RiskFactor {
            risk_type: "cash_flow_risk".to_string(),
            severity: RiskSeverity::High,
            description: format!(
                "Potential negative cash flow for {negative_months} months in pessimistic scenario"
            ),
            mitigation: "Ensure adequate cash reserves and credit facilities".to_string(),
        });
    }

    risks.push(RiskFactor {
        risk_type: "revenue_concentration".to_string(),
        severity: RiskSeverity::Medium,
        description: "High dependency on limited revenue streams".to_string(),
        mitigation: "Diversify revenue sources and customer base".to_string(),
    });
    risks.push(RiskFactor {
        risk_type: "market_risk".to_string(),
        severity: RiskSeverity::Medium,
        description: "Exposure to market volatility and economic downturns".to_string(),
        mitigation: "Maintain flexible cost structure and contingency planning".to_string(),
    });
    risks.push(RiskFactor {
        risk_type: "operational_risk".to_string(),
        severity: RiskSeverity::Low,
        description: "Dependency on key personnel and systems".to_string(),
        mitigation: "Implement succession planning and system redundancy".to_string(),
    });
    risks
}

/// Assemble a plan from combined scenario forecasts.
pub fn build_plan(
    name: &str,
    planning_horizon: PlanningHorizon,
    scenarios: BTreeMap<ScenarioKind, Forecast>,
) -> FinancialPlan {
    let budget_allocations = derive_budget_allocations(&scenarios);
    let kpi_targets = derive_kpi_targets(&scenarios);
    let risk_factors = identify_risk_factors(&scenarios);
    let now = Utc::now();
    FinancialPlan {
        plan_id: Uuid::new_v4(),
        name: name.to_string(),
        planning_horizon,
        scenarios,
        budget_allocations,
        kpi_targets,
        risk_factors,
        created_at: now,
        updated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, TimeZone};
    use pretty_assertions::assert_eq;

    use crate::forecast::{CombinedPoint, PredictionSeries};
    use crate::types::ForecastCategory;

    fn combined_forecast(scenario: ScenarioKind, months: &[(Decimal, Decimal)]) -> Forecast {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let points = months
            .iter()
            .enumerate()
            .map(|(i, &(revenue, cash_flow))| CombinedPoint {
                period: NaiveDate::from_ymd_opt(2025, 2 + i as u32, 1).unwrap(),
                revenue,
                expenses: Decimal::ZERO,
                cash_flow,
                net_income: revenue,
            })
            .collect();
        Forecast {
            forecast_id: Uuid::new_v4(),
            category: ForecastCategory::CashFlow,
            scenario,
            period_start: now,
            period_end: now + Duration::days(30 * months.len() as i64),
            predictions: PredictionSeries::Combined(points),
            confidence_interval: (0.80, 0.95),
            model_accuracy: 0.85,
            assumptions: BTreeMap::new(),
            created_at: now,
        }
    }

    #[test]
    fn test_budget_splits_average_monthly_revenue() {
        let mut scenarios = BTreeMap::new();
        scenarios.insert(
            ScenarioKind::Realistic,
            combined_forecast(
                ScenarioKind::Realistic,
                &[(dec!(800), dec!(0)), (dec!(1200), dec!(0))],
            ),
        );
        // average monthly revenue is exactly 1000
        let budget = derive_budget_allocations(&scenarios);
        assert_eq!(budget["marketing"], dec!(150.00));
        assert_eq!(budget["sales"], dec!(100.00));
        assert_eq!(budget["engineering"], dec!(250.00));
        assert_eq!(budget["operations"], dec!(80.00));
        assert_eq!(budget["admin"], dec!(50.00));
        assert_eq!(budget["contingency"], dec!(100.00));
        let total: Decimal = budget.values().copied().sum();
        assert_eq!(total, dec!(730.00));
    }

    #[test]
    fn test_budget_empty_without_realistic_scenario() {
        let mut scenarios = BTreeMap::new();
        scenarios.insert(
            ScenarioKind::Optimistic,
            combined_forecast(ScenarioKind::Optimistic, &[(dec!(1000), dec!(0))]),
        );
        assert!(derive_budget_allocations(&scenarios).is_empty());
        assert!(derive_budget_allocations(&BTreeMap::new()).is_empty());
    }

    #[test]
    fn test_kpi_targets_use_the_scenario_midpoint() {
        let mut scenarios = BTreeMap::new();
        scenarios.insert(
            ScenarioKind::Realistic,
            combined_forecast(ScenarioKind::Realistic, &[(dec!(10000), dec!(0))]),
        );
        scenarios.insert(
            ScenarioKind::Optimistic,
            combined_forecast(ScenarioKind::Optimistic, &[(dec!(14000), dec!(0))]),
        );
        let targets = derive_kpi_targets(&scenarios);
        assert_eq!(targets["annual_revenue"], dec!(12000));
        assert_eq!(targets["monthly_revenue"], dec!(1000));
        assert_eq!(targets["gross_margin"], dec!(0.70));
        assert_eq!(targets["customer_acquisition_cost"], dec!(100.00));
        assert_eq!(targets["customer_lifetime_value"], dec!(1000.00));
        assert_eq!(targets["cash_runway_months"], dec!(18));
        assert_eq!(targets["burn_rate"], dec!(800));
        assert_eq!(targets.len(), 7);
    }

    #[test]
    fn test_kpi_targets_require_both_scenarios() {
        let mut scenarios = BTreeMap::new();
        scenarios.insert(
            ScenarioKind::Realistic,
            combined_forecast(ScenarioKind::Realistic, &[(dec!(10000), dec!(0))]),
        );
        assert!(derive_kpi_targets(&scenarios).is_empty());
    }

    #[test]
    fn test_cash_flow_risk_requires_more_than_three_negative_months() {
        let negatives = |n: usize| {
            let months: Vec<(Decimal, Decimal)> = (0..6)
                .map(|i| {
                    let cf = if i < n { dec!(-100) } else { dec!(100) };
                    (dec!(1000), cf)
                })
                .collect();
            let mut scenarios = BTreeMap::new();
            scenarios.insert(
                ScenarioKind::Pessimistic,
                combined_forecast(ScenarioKind::Pessimistic, &months),
            );
            identify_risk_factors(&scenarios)
        };

        // exactly at the tolerance: static risks only
        let at_tolerance = negatives(3);
        assert_eq!(at_tolerance.len(), 3);
        assert!(at_tolerance.iter().all(|r| r.risk_type != "cash_flow_risk"));

        // one past the tolerance: cash-flow risk leads
        let over = negatives(4);
        assert_eq!(over.len(), 4);
        assert_eq!(over[0].risk_type, "cash_flow_risk");
        assert_eq!(over[0].severity, RiskSeverity::High);
        assert_eq!(
            over[0].description,
            "Potential negative cash flow for 4 months in pessimistic scenario"
        );
    }

    #[test]
    fn test_static_risks_always_present() {
        let risks = identify_risk_factors(&BTreeMap::new());
        let types: Vec<&str> = risks.iter().map(|r| r.risk_type.as_str()).collect();
        assert_eq!(
            types,
            vec!["revenue_concentration", "market_risk", "operational_risk"]
        );
    }

    #[test]
    fn test_build_plan_assembles_all_derivations() {
        let mut scenarios = BTreeMap::new();
        for kind in ScenarioKind::ALL {
            scenarios.insert(kind, combined_forecast(kind, &[(dec!(1200), dec!(50))]));
        }
        let plan = build_plan("FY2025", PlanningHorizon::Yearly, scenarios);
        assert_eq!(plan.name, "FY2025");
        assert_eq!(plan.planning_horizon, PlanningHorizon::Yearly);
        assert_eq!(plan.scenarios.len(), 3);
        assert_eq!(plan.budget_allocations.len(), 6);
        assert_eq!(plan.kpi_targets.len(), 7);
        assert_eq!(plan.risk_factors.len(), 3);
        assert_eq!(plan.created_at, plan.updated_at);
    }
}
