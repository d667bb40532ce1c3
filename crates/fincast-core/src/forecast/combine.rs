use chrono::{DateTime, Duration, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::forecast::scenario::scenario_assumptions;
use crate::forecast::{CombinedPoint, Forecast, PredictionSeries};
use crate::types::{ForecastCategory, ScenarioKind};

/// Fixed envelope on combined forecasts; the per-category heuristics do not
/// carry through the merge.
pub const COMBINED_CONFIDENCE: (f64, f64) = (0.80, 0.95);
pub const COMBINED_ACCURACY: f64 = 0.85;

/// Merge per-category forecasts for one scenario into a single month-by-month
/// projection with a derived `net_income = revenue - expenses`.
///
/// Categories missing from the map, or months beyond a shorter series,
/// contribute zero. The result is categorized as cash flow.
pub fn combine_forecasts(
    forecasts: &BTreeMap<ForecastCategory, Forecast>,
    scenario: ScenarioKind,
    horizon_months: usize,
    now: DateTime<Utc>,
) -> Forecast {
    let value_at = |category: ForecastCategory, i: usize| -> Decimal {
        forecasts
            .get(&category)
            .and_then(|f| f.predictions.as_points())
            .and_then(|points| points.get(i))
            .and_then(|p| Decimal::from_f64(p.value))
            .unwrap_or(Decimal::ZERO)
    };

    let points: Vec<CombinedPoint> = (0..horizon_months)
        .map(|i| {
            let revenue = value_at(ForecastCategory::Revenue, i);
            let expenses = value_at(ForecastCategory::Expenses, i);
            let cash_flow = value_at(ForecastCategory::CashFlow, i);
            CombinedPoint {
                period: (now + Duration::days(30 * (i as i64 + 1))).date_naive(),
                revenue,
                expenses,
                cash_flow,
                net_income: revenue - expenses,
            }
        })
        .collect();

    Forecast {
        forecast_id: Uuid::new_v4(),
        category: ForecastCategory::CashFlow,
        scenario,
        period_start: now,
        period_end: now + Duration::days(30 * horizon_months as i64),
        predictions: PredictionSeries::Combined(points),
        confidence_interval: COMBINED_CONFIDENCE,
        model_accuracy: COMBINED_ACCURACY,
        assumptions: scenario_assumptions(scenario),
        created_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use crate::forecast::ForecastPoint;
    use crate::types::ModelKind;

    fn point_forecast(
        category: ForecastCategory,
        scenario: ScenarioKind,
        values: &[f64],
    ) -> Forecast {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let points = values
            .iter()
            .enumerate()
            .map(|(i, &value)| ForecastPoint {
                period: NaiveDate::from_ymd_opt(2025, 2 + i as u32, 1).unwrap(),
                value,
                model: ModelKind::LinearRegression,
                scenario: Some(scenario),
                adjustments: None,
            })
            .collect();
        Forecast {
            forecast_id: Uuid::new_v4(),
            category,
            scenario,
            period_start: now,
            period_end: now + Duration::days(30 * values.len() as i64),
            predictions: PredictionSeries::Points(points),
            confidence_interval: (0.80, 1.00),
            model_accuracy: 0.9,
            assumptions: BTreeMap::new(),
            created_at: now,
        }
    }

    #[test]
    fn test_net_income_is_revenue_minus_expenses() {
        let scenario = ScenarioKind::Realistic;
        let mut inputs = BTreeMap::new();
        inputs.insert(
            ForecastCategory::Revenue,
            point_forecast(ForecastCategory::Revenue, scenario, &[1000.0, 1100.0]),
        );
        inputs.insert(
            ForecastCategory::Expenses,
            point_forecast(ForecastCategory::Expenses, scenario, &[600.0, 650.0]),
        );
        inputs.insert(
            ForecastCategory::CashFlow,
            point_forecast(ForecastCategory::CashFlow, scenario, &[400.0, 450.0]),
        );

        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let combined = combine_forecasts(&inputs, scenario, 2, now);
        let points = combined.predictions.as_combined().unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].revenue, dec!(1000));
        assert_eq!(points[0].expenses, dec!(600));
        assert_eq!(points[0].net_income, dec!(400));
        for p in points {
            assert_eq!(p.net_income, p.revenue - p.expenses);
        }
    }

    #[test]
    fn test_missing_categories_contribute_zero() {
        let scenario = ScenarioKind::Pessimistic;
        let mut inputs = BTreeMap::new();
        inputs.insert(
            ForecastCategory::Revenue,
            point_forecast(ForecastCategory::Revenue, scenario, &[500.0]),
        );

        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let combined = combine_forecasts(&inputs, scenario, 3, now);
        let points = combined.predictions.as_combined().unwrap();
        assert_eq!(points.len(), 3);
        // month 0 has revenue only; months 1-2 overrun the revenue series
        assert_eq!(points[0].revenue, dec!(500));
        assert_eq!(points[0].expenses, Decimal::ZERO);
        assert_eq!(points[0].net_income, dec!(500));
        assert_eq!(points[1].revenue, Decimal::ZERO);
        assert_eq!(points[2].cash_flow, Decimal::ZERO);
    }

    #[test]
    fn test_combined_envelope_and_category_are_fixed() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let combined = combine_forecasts(&BTreeMap::new(), ScenarioKind::Optimistic, 12, now);
        assert_eq!(combined.category, ForecastCategory::CashFlow);
        assert_eq!(combined.confidence_interval, COMBINED_CONFIDENCE);
        assert_eq!(combined.model_accuracy, COMBINED_ACCURACY);
        assert_eq!(combined.assumptions.len(), 5);
        assert_eq!(
            combined.period_end,
            now + Duration::days(360)
        );
    }

    #[test]
    fn test_combined_periods_step_thirty_days() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let combined = combine_forecasts(&BTreeMap::new(), ScenarioKind::Realistic, 3, now);
        let points = combined.predictions.as_combined().unwrap();
        assert_eq!(points[0].period, NaiveDate::from_ymd_opt(2025, 1, 31).unwrap());
        assert_eq!(points[1].period, NaiveDate::from_ymd_opt(2025, 3, 2).unwrap());
        assert_eq!(points[2].period, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
    }
}
