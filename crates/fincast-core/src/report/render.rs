use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::plan::{FinancialPlan, RiskFactor};
use crate::types::{RiskSeverity, ScenarioKind};

// ---------------------------------------------------------------------------
// Report shape
// ---------------------------------------------------------------------------

/// Headline figures from the realistic scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutiveSummary {
    pub planning_period: String,
    pub projected_revenue: Decimal,
    pub projected_expenses: Decimal,
    pub projected_net_income: Decimal,
    pub key_assumptions: BTreeMap<String, String>,
    /// Realistic model accuracy rendered as "NN.N%".
    pub confidence_level: String,
}

/// Totals for one scenario across its projected months.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub total_revenue: Decimal,
    pub total_expenses: Decimal,
    pub total_net_income: Decimal,
    pub assumptions: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetLine {
    pub amount: Decimal,
    /// Share of the allocated total, one decimal place, e.g. "20.5%".
    pub percentage: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetBreakdown {
    pub total_budget: Decimal,
    pub allocations: BTreeMap<String, BudgetLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiDashboard {
    pub targets: BTreeMap<String, Decimal>,
    pub tracking_frequency: String,
    pub review_schedule: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub total_risks: usize,
    pub high_severity: usize,
    pub medium_severity: usize,
    pub low_severity: usize,
    pub risks: Vec<RiskFactor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub area: String,
    pub priority: String,
    pub action: String,
    pub expected_impact: String,
}

/// The rendered planning report. Echoes the plan so the report is a
/// self-contained document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningReport {
    pub plan: FinancialPlan,
    /// Absent when the plan carries no realistic scenario.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executive_summary: Option<ExecutiveSummary>,
    pub scenario_analysis: BTreeMap<ScenarioKind, ScenarioSummary>,
    pub budget_breakdown: BudgetBreakdown,
    pub kpi_dashboard: KpiDashboard,
    pub risk_assessment: RiskAssessment,
    pub recommendations: Vec<Recommendation>,
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render a plan into its report sections. Pure; the plan is echoed, never
/// mutated.
pub fn render_report(plan: &FinancialPlan) -> PlanningReport {
    PlanningReport {
        plan: plan.clone(),
        executive_summary: executive_summary(plan),
        scenario_analysis: scenario_analysis(plan),
        budget_breakdown: budget_breakdown(plan),
        kpi_dashboard: kpi_dashboard(plan),
        risk_assessment: risk_assessment(plan),
        recommendations: recommendations(),
    }
}

fn scenario_totals(plan: &FinancialPlan, kind: ScenarioKind) -> Option<ScenarioSummary> {
    let forecast = plan.scenarios.get(&kind)?;
    let points = forecast.predictions.as_combined()?;
    Some(ScenarioSummary {
        total_revenue: points.iter().map(|p| p.revenue).sum(),
        total_expenses: points.iter().map(|p| p.expenses).sum(),
        total_net_income: points.iter().map(|p| p.net_income).sum(),
        assumptions: forecast.assumptions.clone(),
    })
}

fn executive_summary(plan: &FinancialPlan) -> Option<ExecutiveSummary> {
    let realistic = plan.scenarios.get(&ScenarioKind::Realistic)?;
    let totals = scenario_totals(plan, ScenarioKind::Realistic)?;
    Some(ExecutiveSummary {
        planning_period: format!("{} plan", plan.planning_horizon),
        projected_revenue: totals.total_revenue,
        projected_expenses: totals.total_expenses,
        projected_net_income: totals.total_net_income,
        key_assumptions: realistic.assumptions.clone(),
        confidence_level: format!("{:.1}%", realistic.model_accuracy * 100.0),
    })
}

fn scenario_analysis(plan: &FinancialPlan) -> BTreeMap<ScenarioKind, ScenarioSummary> {
    ScenarioKind::ALL
        .into_iter()
        .filter_map(|kind| scenario_totals(plan, kind).map(|summary| (kind, summary)))
        .collect()
}

fn budget_breakdown(plan: &FinancialPlan) -> BudgetBreakdown {
    let total_budget: Decimal = plan.budget_allocations.values().copied().sum();
    let allocations = plan
        .budget_allocations
        .iter()
        .map(|(name, &amount)| {
            let share = if total_budget.is_zero() {
                Decimal::ZERO
            } else {
                (amount / total_budget * dec!(100)).round_dp(1)
            };
            (
                name.clone(),
                BudgetLine {
                    amount,
                    percentage: format!("{share}%"),
                },
            )
        })
        .collect();
    BudgetBreakdown {
        total_budget,
        allocations,
    }
}

fn kpi_dashboard(plan: &FinancialPlan) -> KpiDashboard {
    KpiDashboard {
        targets: plan.kpi_targets.clone(),
        tracking_frequency: "monthly".to_string(),
        review_schedule: "quarterly".to_string(),
    }
}

fn risk_assessment(plan: &FinancialPlan) -> RiskAssessment {
    let count = |severity: RiskSeverity| {
        plan.risk_factors
            .iter()
            .filter(|r| r.severity == severity)
            .count()
    };
    RiskAssessment {
        total_risks: plan.risk_factors.len(),
        high_severity: count(RiskSeverity::High),
        medium_severity: count(RiskSeverity::Medium),
        low_severity: count(RiskSeverity::Low),
        risks: plan.risk_factors.clone(),
    }
}

fn recommendations() -> Vec<Recommendation> {
    let entries = [
        (
            "Revenue Optimization",
            "High",
            "Focus on high-margin revenue streams and customer retention",
            "Increase revenue by 15-25%",
        ),
        (
            "Cost Management",
            "Medium",
            "Implement automated expense management and approval workflows",
            "Reduce operational costs by 10-15%",
        ),
        (
            "Cash Flow",
            "High",
            "Optimize payment terms and implement automated collections",
            "Improve cash flow by 20-30%",
        ),
        (
            "Risk Management",
            "Medium",
            "Establish emergency fund and diversify revenue sources",
            "Reduce financial risk exposure by 40%",
        ),
    ];
    entries
        .iter()
        .map(|(area, priority, action, expected_impact)| Recommendation {
            area: area.to_string(),
            priority: priority.to_string(),
            action: action.to_string(),
            expected_impact: expected_impact.to_string(),
        })
        .collect()
}
