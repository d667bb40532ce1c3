pub mod accuracy;
pub mod combine;
pub mod models;
pub mod scenario;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::types::{ForecastCategory, ModelKind, ScenarioKind};
use scenario::AdjustmentFactors;

/// A single predicted monthly value.
///
/// Created by a model fitter, adjusted in place once by the scenario
/// adjuster, then frozen. The value is an f64 modeling quantity; decimal
/// precision is restored when forecasts are combined.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub period: NaiveDate,
    pub value: f64,
    /// The fitter that actually produced the point.
    pub model: ModelKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scenario: Option<ScenarioKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjustments: Option<AdjustmentFactors>,
}

/// One month of a combined scenario projection. Decimal fields so that
/// `net_income == revenue - expenses` holds exactly through serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedPoint {
    pub period: NaiveDate,
    pub revenue: Decimal,
    pub expenses: Decimal,
    pub cash_flow: Decimal,
    pub net_income: Decimal,
}

/// Predictions carried by a forecast: per-model points for base forecasts,
/// merged per-month records for combined forecasts. The two shapes have
/// disjoint field names, so untagged serde round-trips unambiguously.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictionSeries {
    Points(Vec<ForecastPoint>),
    Combined(Vec<CombinedPoint>),
}

impl PredictionSeries {
    pub fn len(&self) -> usize {
        match self {
            PredictionSeries::Points(points) => points.len(),
            PredictionSeries::Combined(points) => points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_points(&self) -> Option<&[ForecastPoint]> {
        match self {
            PredictionSeries::Points(points) => Some(points),
            PredictionSeries::Combined(_) => None,
        }
    }

    pub fn as_combined(&self) -> Option<&[CombinedPoint]> {
        match self {
            PredictionSeries::Combined(points) => Some(points),
            PredictionSeries::Points(_) => None,
        }
    }
}

/// A generated financial forecast for one (category, scenario) pair, or the
/// combined output of the forecast combiner. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast {
    pub forecast_id: Uuid,
    pub category: ForecastCategory,
    pub scenario: ScenarioKind,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    /// Invariant: `predictions.len()` equals the requested horizon.
    pub predictions: PredictionSeries,
    /// (lower, upper) bounds as fractions; a heuristic, not a fitted interval.
    pub confidence_interval: (f64, f64),
    /// Backtested accuracy score in [0, 0.95].
    pub model_accuracy: f64,
    pub assumptions: BTreeMap<String, String>,
    pub created_at: DateTime<Utc>,
}
