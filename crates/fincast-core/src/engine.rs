use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::PlanningError;
use crate::forecast::models::{forecast_with_model, model_config};
use crate::forecast::scenario::{apply_adjustments, scenario_assumptions};
use crate::forecast::{accuracy, combine, Forecast, PredictionSeries};
use crate::metrics::series::aggregate_monthly;
use crate::metrics::store::{MetricRecord, MetricStore};
use crate::plan::{builder, FinancialPlan};
use crate::report::{render_report, PlanningReport};
use crate::types::{ForecastCategory, PlanningHorizon, ScenarioKind};
use crate::PlanningResult;

/// The planning engine: owns the historical metric store, every generated
/// forecast and plan, and the RNG used for scenario volatility.
///
/// All operations are synchronous; fitting is pure CPU work. Seed the engine
/// for reproducible scenario adjustments.
pub struct FinancialPlanningEngine {
    store: MetricStore,
    forecasts: Vec<Forecast>,
    plans: Vec<FinancialPlan>,
    rng: StdRng,
}

impl FinancialPlanningEngine {
    /// Engine with entropy-seeded volatility.
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Engine with a fixed seed; identical inputs yield identical forecasts.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            store: MetricStore::new(),
            forecasts: Vec::new(),
            plans: Vec::new(),
            rng,
        }
    }

    /// Append historical metrics. Returns the number stored.
    pub fn add_historical_data(&mut self, records: Vec<MetricRecord>) -> usize {
        let added = self.store.add_records(records);
        info!(added, total = self.store.len(), "historical metrics ingested");
        added
    }

    pub fn metric_count(&self) -> usize {
        self.store.len()
    }

    /// Generate a forecast for one (category, scenario) pair.
    ///
    /// Pipeline: classify relevant metrics, aggregate monthly, fit the
    /// category's configured model, apply scenario adjustments, then attach
    /// the confidence interval, backtested accuracy and assumptions.
    pub fn generate_forecast(
        &mut self,
        category: ForecastCategory,
        scenario: ScenarioKind,
        horizon_months: usize,
    ) -> PlanningResult<Forecast> {
        let relevant = self.store.relevant_for(category);
        if relevant.is_empty() {
            return Err(PlanningError::NoHistoricalData(category));
        }
        let series = aggregate_monthly(&relevant);
        let config = model_config(category);
        let mut points = forecast_with_model(config.model, &series, horizon_months)?;
        apply_adjustments(&mut points, scenario, category, &mut self.rng);

        let now = Utc::now();
        let forecast = Forecast {
            forecast_id: Uuid::new_v4(),
            category,
            scenario,
            period_start: now,
            period_end: now + Duration::days(30 * horizon_months as i64),
            predictions: PredictionSeries::Points(points),
            confidence_interval: accuracy::confidence_interval(category),
            model_accuracy: accuracy::estimate_accuracy(&series),
            assumptions: scenario_assumptions(scenario),
            created_at: now,
        };
        debug!(
            forecast_id = %forecast.forecast_id,
            category = %category,
            scenario = %scenario,
            months = horizon_months,
            accuracy = forecast.model_accuracy,
            "forecast generated"
        );
        self.forecasts.push(forecast.clone());
        Ok(forecast)
    }

    /// Build a complete plan: forecast revenue, expenses and cash flow under
    /// each scenario, combine per scenario, then derive budget, KPI targets
    /// and risks.
    pub fn create_financial_plan(
        &mut self,
        name: &str,
        planning_horizon: PlanningHorizon,
        horizon_months: usize,
    ) -> PlanningResult<FinancialPlan> {
        let mut scenarios = BTreeMap::new();
        for scenario in ScenarioKind::ALL {
            let mut per_category = BTreeMap::new();
            for category in ForecastCategory::PLAN_CATEGORIES {
                let forecast = self.generate_forecast(category, scenario, horizon_months)?;
                per_category.insert(category, forecast);
            }
            let combined =
                combine::combine_forecasts(&per_category, scenario, horizon_months, Utc::now());
            scenarios.insert(scenario, combined);
        }
        let plan = builder::build_plan(name, planning_horizon, scenarios);
        info!(
            plan_id = %plan.plan_id,
            name = %plan.name,
            months = horizon_months,
            risks = plan.risk_factors.len(),
            "financial plan created"
        );
        self.plans.push(plan.clone());
        Ok(plan)
    }

    pub fn forecast(&self, id: Uuid) -> PlanningResult<&Forecast> {
        self.forecasts
            .iter()
            .find(|f| f.forecast_id == id)
            .ok_or(PlanningError::NotFound {
                kind: "forecast",
                id,
            })
    }

    pub fn plan(&self, id: Uuid) -> PlanningResult<&FinancialPlan> {
        self.plans
            .iter()
            .find(|p| p.plan_id == id)
            .ok_or(PlanningError::NotFound { kind: "plan", id })
    }

    /// Render the report for a previously created plan.
    pub fn planning_report(&self, plan_id: Uuid) -> PlanningResult<PlanningReport> {
        let plan = self.plan(plan_id)?;
        Ok(render_report(plan))
    }
}

impl Default for FinancialPlanningEngine {
    fn default() -> Self {
        Self::new()
    }
}
