pub mod builder;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::forecast::Forecast;
use crate::types::{Money, PlanningHorizon, RiskSeverity, ScenarioKind};

/// A qualitative risk carried on a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    #[serde(rename = "type")]
    pub risk_type: String,
    pub severity: RiskSeverity,
    pub description: String,
    pub mitigation: String,
}

/// A complete financial plan: one combined forecast per scenario plus the
/// budget, KPI targets and risks derived from them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialPlan {
    pub plan_id: Uuid,
    pub name: String,
    pub planning_horizon: PlanningHorizon,
    pub scenarios: BTreeMap<ScenarioKind, Forecast>,
    /// Category name to monthly amount.
    pub budget_allocations: BTreeMap<String, Money>,
    pub kpi_targets: BTreeMap<String, Money>,
    pub risk_factors: Vec<RiskFactor>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
