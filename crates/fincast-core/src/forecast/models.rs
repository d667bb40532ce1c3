use chrono::Duration;
use tracing::debug;

use crate::forecast::ForecastPoint;
use crate::metrics::series::MonthPoint;
use crate::types::{ForecastCategory, ModelKind};
use crate::{PlanningError, PlanningResult};

/// Smoothing constant for exponential smoothing.
const ALPHA: f64 = 0.3;

/// Growth rate assumed when history is too thin to derive one.
const DEFAULT_GROWTH_RATE: f64 = 0.05;

// ---------------------------------------------------------------------------
// Model configuration
// ---------------------------------------------------------------------------

/// Per-category model configuration.
#[derive(Debug, Clone, Copy)]
pub struct ModelConfig {
    pub model: ModelKind,
    /// Base confidence level feeding the interval heuristic.
    pub confidence_level: f64,
}

/// Static model-selection table. Categories without an entry (churn)
/// default to linear regression.
pub fn model_config(category: ForecastCategory) -> ModelConfig {
    match category {
        ForecastCategory::Revenue => ModelConfig {
            model: ModelKind::LinearRegression,
            confidence_level: 0.95,
        },
        ForecastCategory::Expenses => ModelConfig {
            model: ModelKind::PolynomialRegression,
            confidence_level: 0.90,
        },
        ForecastCategory::CashFlow => ModelConfig {
            model: ModelKind::Arima,
            confidence_level: 0.95,
        },
        ForecastCategory::Growth => ModelConfig {
            model: ModelKind::ExponentialSmoothing,
            confidence_level: 0.85,
        },
        _ => ModelConfig {
            model: ModelKind::LinearRegression,
            confidence_level: 0.95,
        },
    }
}

/// Dispatch to the configured fitter.
///
/// `Arima` delegates to exponential smoothing (no autoregressive structure
/// is modeled); its points are tagged with the fitter that actually ran.
pub fn forecast_with_model(
    model: ModelKind,
    series: &[MonthPoint],
    horizon: usize,
) -> PlanningResult<Vec<ForecastPoint>> {
    match model {
        ModelKind::LinearRegression => linear_regression_forecast(series, horizon),
        ModelKind::PolynomialRegression => polynomial_regression_forecast(series, horizon),
        ModelKind::Arima | ModelKind::ExponentialSmoothing => {
            exponential_smoothing_forecast(series, horizon)
        }
        ModelKind::SimpleTrend => simple_trend_forecast(series, horizon),
    }
}

// ---------------------------------------------------------------------------
// Fitters
// ---------------------------------------------------------------------------

/// Ordinary least squares of value against the month index 0..N-1.
/// Predictions are floored at zero. Falls back to the simple trend model
/// when fewer than two observations exist.
pub fn linear_regression_forecast(
    series: &[MonthPoint],
    horizon: usize,
) -> PlanningResult<Vec<ForecastPoint>> {
    if series.len() < 2 {
        debug!(observations = series.len(), "linear fit: falling back to simple trend");
        return simple_trend_forecast(series, horizon);
    }
    let projected = linear_projection(series, horizon);
    Ok(make_points(series, projected, ModelKind::LinearRegression))
}

/// Degree-2 least squares over the month index, solved via the normal
/// equations. Predictions are floored at zero. Falls back to linear
/// regression when fewer than three observations exist.
pub fn polynomial_regression_forecast(
    series: &[MonthPoint],
    horizon: usize,
) -> PlanningResult<Vec<ForecastPoint>> {
    if series.len() < 3 {
        debug!(observations = series.len(), "quadratic fit: falling back to linear");
        return linear_regression_forecast(series, horizon);
    }
    let values: Vec<f64> = series.iter().map(|p| p.value).collect();
    let (c0, c1, c2) = quadratic_fit(&values);
    let projected: Vec<f64> = (0..horizon)
        .map(|i| {
            let x = (series.len() + i) as f64;
            (c0 + c1 * x + c2 * x * x).max(0.0)
        })
        .collect();
    Ok(make_points(series, projected, ModelKind::PolynomialRegression))
}

/// Single-parameter exponential smoothing (α = 0.3). The trend is the delta
/// of the last two smoothed values, zero for a single observation, so one
/// data point yields a flat extrapolation. Predictions are floored at zero.
pub fn exponential_smoothing_forecast(
    series: &[MonthPoint],
    horizon: usize,
) -> PlanningResult<Vec<ForecastPoint>> {
    if series.is_empty() {
        debug!("exponential smoothing: falling back to simple trend");
        return simple_trend_forecast(series, horizon);
    }
    let mut smoothed = Vec::with_capacity(series.len());
    smoothed.push(series[0].value);
    for point in &series[1..] {
        let prev = smoothed[smoothed.len() - 1];
        smoothed.push(ALPHA * point.value + (1.0 - ALPHA) * prev);
    }
    let last = smoothed[smoothed.len() - 1];
    let trend = if smoothed.len() >= 2 {
        last - smoothed[smoothed.len() - 2]
    } else {
        0.0
    };
    let projected: Vec<f64> = (1..=horizon)
        .map(|step| (last + trend * step as f64).max(0.0))
        .collect();
    Ok(make_points(series, projected, ModelKind::ExponentialSmoothing))
}

/// Compound growth from the first and last observed values:
/// `(last/first)^(1/N) - 1`, defaulting to 5% when fewer than two points
/// exist or the first value is zero. The only fitter whose output is NOT
/// floored at zero.
pub fn simple_trend_forecast(
    series: &[MonthPoint],
    horizon: usize,
) -> PlanningResult<Vec<ForecastPoint>> {
    let Some(last) = series.last() else {
        return Err(PlanningError::InsufficientData(
            "no monthly observations to fit a trend".into(),
        ));
    };
    let growth_rate = if series.len() >= 2 && series[0].value != 0.0 {
        (last.value / series[0].value).powf(1.0 / series.len() as f64) - 1.0
    } else {
        DEFAULT_GROWTH_RATE
    };
    let projected: Vec<f64> = (1..=horizon)
        .map(|step| last.value * (1.0 + growth_rate).powi(step as i32))
        .collect();
    Ok(make_points(series, projected, ModelKind::SimpleTrend))
}

// ---------------------------------------------------------------------------
// Numeric helpers
// ---------------------------------------------------------------------------

/// Project `horizon` values beyond the series with an OLS line, floored at
/// zero. Shared by the linear fitter and the accuracy backtest.
pub(crate) fn linear_projection(series: &[MonthPoint], horizon: usize) -> Vec<f64> {
    let values: Vec<f64> = series.iter().map(|p| p.value).collect();
    let (slope, intercept) = ols_fit(&values);
    (0..horizon)
        .map(|i| (slope * (series.len() + i) as f64 + intercept).max(0.0))
        .collect()
}

/// Slope and intercept of an OLS line over indices 0..N-1.
fn ols_fit(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let x_mean = (values.len() - 1) as f64 / 2.0;
    let y_mean = values.iter().sum::<f64>() / n;
    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        numerator += dx * (y - y_mean);
        denominator += dx * dx;
    }
    let slope = if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    };
    (slope, y_mean - slope * x_mean)
}

/// Least-squares quadratic coefficients (c0, c1, c2) over indices 0..N-1,
/// via the 3x3 normal equations.
fn quadratic_fit(values: &[f64]) -> (f64, f64, f64) {
    // Power sums S_k = Σ x^k and moment sums T_k = Σ y·x^k
    let mut s = [0.0_f64; 5];
    let mut t = [0.0_f64; 3];
    for (i, &y) in values.iter().enumerate() {
        let x = i as f64;
        let mut xk = 1.0;
        for k in 0..5 {
            s[k] += xk;
            if k < 3 {
                t[k] += y * xk;
            }
            xk *= x;
        }
    }
    let a = [
        [s[0], s[1], s[2]],
        [s[1], s[2], s[3]],
        [s[2], s[3], s[4]],
    ];
    let x = solve3(a, t);
    (x[0], x[1], x[2])
}

/// Gaussian elimination with partial pivoting on a 3x3 system. Degenerate
/// pivots leave the corresponding coefficient at zero.
fn solve3(mut a: [[f64; 3]; 3], mut b: [f64; 3]) -> [f64; 3] {
    for col in 0..3 {
        let mut pivot = col;
        for row in col + 1..3 {
            if a[row][col].abs() > a[pivot][col].abs() {
                pivot = row;
            }
        }
        a.swap(col, pivot);
        b.swap(col, pivot);
        if a[col][col].abs() < f64::EPSILON {
            continue;
        }
        for row in col + 1..3 {
            let factor = a[row][col] / a[col][col];
            for k in col..3 {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }
    let mut x = [0.0_f64; 3];
    for col in (0..3).rev() {
        let mut sum = b[col];
        for k in col + 1..3 {
            sum -= a[col][k] * x[k];
        }
        x[col] = if a[col][col].abs() < f64::EPSILON {
            0.0
        } else {
            sum / a[col][col]
        };
    }
    x
}

/// Wrap projected values into dated, tagged points. Future periods step
/// 30 days at a time beyond the last observed month.
fn make_points(series: &[MonthPoint], projected: Vec<f64>, model: ModelKind) -> Vec<ForecastPoint> {
    let last_month = series[series.len() - 1].month;
    projected
        .into_iter()
        .enumerate()
        .map(|(i, value)| ForecastPoint {
            period: last_month + Duration::days(30 * (i as i64 + 1)),
            value,
            model,
            scenario: None,
            adjustments: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn series(values: &[f64]) -> Vec<MonthPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| MonthPoint {
                month: NaiveDate::from_ymd_opt(2024, 1 + i as u32, 1).unwrap(),
                value,
            })
            .collect()
    }

    #[test]
    fn test_linear_fit_on_straight_line() {
        // y = 10x + 100 over x = 0..5
        let s = series(&[100.0, 110.0, 120.0, 130.0, 140.0, 150.0]);
        let points = linear_regression_forecast(&s, 3).unwrap();
        assert_eq!(points.len(), 3);
        for (i, p) in points.iter().enumerate() {
            let expected = 10.0 * (6 + i) as f64 + 100.0;
            assert!((p.value - expected).abs() < 1e-9, "point {i}: {}", p.value);
            assert_eq!(p.model, ModelKind::LinearRegression);
        }
    }

    #[test]
    fn test_linear_fit_floors_at_zero() {
        // Steeply declining series drives predictions negative
        let s = series(&[100.0, 50.0, 0.0]);
        let points = linear_regression_forecast(&s, 4).unwrap();
        assert!(points.iter().all(|p| p.value >= 0.0));
        assert_eq!(points[3].value, 0.0);
    }

    #[test]
    fn test_linear_falls_back_to_simple_trend() {
        let s = series(&[100.0]);
        let points = linear_regression_forecast(&s, 2).unwrap();
        assert_eq!(points[0].model, ModelKind::SimpleTrend);
    }

    #[test]
    fn test_quadratic_fit_recovers_parabola() {
        // y = 2 + 3x + x^2 over x = 0..4
        let s = series(&[2.0, 6.0, 12.0, 20.0, 30.0]);
        let points = polynomial_regression_forecast(&s, 2).unwrap();
        // x = 5 -> 42, x = 6 -> 56
        assert!((points[0].value - 42.0).abs() < 1e-6, "{}", points[0].value);
        assert!((points[1].value - 56.0).abs() < 1e-6, "{}", points[1].value);
        assert_eq!(points[0].model, ModelKind::PolynomialRegression);
    }

    #[test]
    fn test_polynomial_falls_back_to_linear() {
        let s = series(&[100.0, 110.0]);
        let points = polynomial_regression_forecast(&s, 2).unwrap();
        assert_eq!(points[0].model, ModelKind::LinearRegression);
    }

    #[test]
    fn test_exponential_smoothing_small_case() {
        let s = series(&[100.0, 200.0]);
        // smoothed = [100, 0.3*200 + 0.7*100 = 130]; trend = 30
        let points = exponential_smoothing_forecast(&s, 3).unwrap();
        assert!((points[0].value - 160.0).abs() < 1e-9);
        assert!((points[1].value - 190.0).abs() < 1e-9);
        assert!((points[2].value - 220.0).abs() < 1e-9);
        assert_eq!(points[0].model, ModelKind::ExponentialSmoothing);
    }

    #[test]
    fn test_exponential_smoothing_single_point_is_flat() {
        let s = series(&[500.0]);
        let points = exponential_smoothing_forecast(&s, 6).unwrap();
        assert_eq!(points.len(), 6);
        assert!(points.iter().all(|p| p.value == 500.0));
    }

    #[test]
    fn test_exponential_smoothing_floors_at_zero() {
        let s = series(&[100.0, 10.0, 1.0]);
        let points = exponential_smoothing_forecast(&s, 12).unwrap();
        assert!(points.iter().all(|p| p.value >= 0.0));
    }

    #[test]
    fn test_simple_trend_compounds_growth() {
        // first 100, last 400 over 2 points: rate = 4^(1/2) - 1 = 1.0
        let s = series(&[100.0, 400.0]);
        let points = simple_trend_forecast(&s, 3).unwrap();
        assert!((points[0].value - 800.0).abs() < 1e-9);
        assert!((points[1].value - 1600.0).abs() < 1e-9);
        assert!((points[2].value - 3200.0).abs() < 1e-9);
    }

    #[test]
    fn test_simple_trend_default_rate_for_single_point() {
        let s = series(&[100.0]);
        let points = simple_trend_forecast(&s, 2).unwrap();
        assert!((points[0].value - 105.0).abs() < 1e-9);
        assert!((points[1].value - 110.25).abs() < 1e-9);
    }

    #[test]
    fn test_simple_trend_guards_zero_first_value() {
        let s = series(&[0.0, 100.0]);
        let points = simple_trend_forecast(&s, 1).unwrap();
        // falls back to the 5% default instead of dividing by zero
        assert!((points[0].value - 105.0).abs() < 1e-9);
    }

    #[test]
    fn test_simple_trend_output_is_not_floored() {
        // Shrinking negative series stays negative
        let s = series(&[-100.0, -50.0]);
        let points = simple_trend_forecast(&s, 3).unwrap();
        assert!(points.iter().all(|p| p.value < 0.0));
    }

    #[test]
    fn test_simple_trend_empty_series_errors() {
        assert!(simple_trend_forecast(&[], 3).is_err());
    }

    #[test]
    fn test_every_fitter_returns_horizon_points() {
        let s = series(&[10.0, 20.0, 30.0, 40.0]);
        for model in [
            ModelKind::LinearRegression,
            ModelKind::PolynomialRegression,
            ModelKind::Arima,
            ModelKind::ExponentialSmoothing,
            ModelKind::SimpleTrend,
        ] {
            let points = forecast_with_model(model, &s, 12).unwrap();
            assert_eq!(points.len(), 12, "{model}");
        }
    }

    #[test]
    fn test_arima_delegates_to_exponential_smoothing() {
        let s = series(&[10.0, 20.0, 30.0]);
        let points = forecast_with_model(ModelKind::Arima, &s, 2).unwrap();
        assert_eq!(points[0].model, ModelKind::ExponentialSmoothing);
    }

    #[test]
    fn test_point_periods_step_thirty_days() {
        let s = series(&[10.0, 20.0]);
        let points = linear_regression_forecast(&s, 2).unwrap();
        let last = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        assert_eq!(points[0].period, last + chrono::Duration::days(30));
        assert_eq!(points[1].period, last + chrono::Duration::days(60));
    }

    #[test]
    fn test_model_config_table() {
        assert_eq!(
            model_config(ForecastCategory::Revenue).model,
            ModelKind::LinearRegression
        );
        assert_eq!(
            model_config(ForecastCategory::Expenses).model,
            ModelKind::PolynomialRegression
        );
        assert_eq!(
            model_config(ForecastCategory::CashFlow).model,
            ModelKind::Arima
        );
        assert_eq!(
            model_config(ForecastCategory::Growth).model,
            ModelKind::ExponentialSmoothing
        );
        // unmapped categories default to linear regression
        assert_eq!(
            model_config(ForecastCategory::Churn).model,
            ModelKind::LinearRegression
        );
        assert_eq!(model_config(ForecastCategory::Churn).confidence_level, 0.95);
    }
}
