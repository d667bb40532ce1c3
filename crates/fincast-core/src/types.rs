use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// What a forecast is about.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ForecastCategory {
    Revenue,
    Expenses,
    CashFlow,
    Growth,
    Churn,
}

impl ForecastCategory {
    /// The three categories a financial plan is built from.
    pub const PLAN_CATEGORIES: [ForecastCategory; 3] = [
        ForecastCategory::Revenue,
        ForecastCategory::Expenses,
        ForecastCategory::CashFlow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastCategory::Revenue => "revenue",
            ForecastCategory::Expenses => "expenses",
            ForecastCategory::CashFlow => "cash_flow",
            ForecastCategory::Growth => "growth",
            ForecastCategory::Churn => "churn",
        }
    }
}

impl fmt::Display for ForecastCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named economic scenario applied to a forecast's predicted points.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    Optimistic,
    Realistic,
    Pessimistic,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 3] = [
        ScenarioKind::Optimistic,
        ScenarioKind::Realistic,
        ScenarioKind::Pessimistic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioKind::Optimistic => "optimistic",
            ScenarioKind::Realistic => "realistic",
            ScenarioKind::Pessimistic => "pessimistic",
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Granularity label for a financial plan.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PlanningHorizon {
    Monthly,
    Quarterly,
    Yearly,
    MultiYear,
}

impl PlanningHorizon {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanningHorizon::Monthly => "monthly",
            PlanningHorizon::Quarterly => "quarterly",
            PlanningHorizon::Yearly => "yearly",
            PlanningHorizon::MultiYear => "multi_year",
        }
    }
}

impl fmt::Display for PlanningHorizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fitting strategy used to produce a forecast's points.
///
/// `Arima` is a label only: it dispatches to exponential smoothing and no
/// autoregressive structure is modeled.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    LinearRegression,
    PolynomialRegression,
    Arima,
    ExponentialSmoothing,
    SimpleTrend,
}

impl ModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::LinearRegression => "linear_regression",
            ModelKind::PolynomialRegression => "polynomial_regression",
            ModelKind::Arima => "arima",
            ModelKind::ExponentialSmoothing => "exponential_smoothing",
            ModelKind::SimpleTrend => "simple_trend",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity grade for an identified risk factor.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RiskSeverity {
    Low,
    Medium,
    High,
}

impl RiskSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskSeverity::Low => "low",
            RiskSeverity::Medium => "medium",
            RiskSeverity::High => "high",
        }
    }
}

impl fmt::Display for RiskSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
