use crate::forecast::models::{self, model_config};
use crate::metrics::series::MonthPoint;
use crate::types::ForecastCategory;

/// Accuracy reported when the series is too short to backtest.
pub const DEFAULT_ACCURACY: f64 = 0.7;
/// Ceiling applied to every backtested score.
pub const MAX_ACCURACY: f64 = 0.95;

/// Backtest a linear projection against a 75/25 train/test split and score
/// it as `1 - MAPE`, clamped to `[0, MAX_ACCURACY]`.
///
/// Series with fewer than four monthly observations cannot be split and get
/// [`DEFAULT_ACCURACY`]. A test month with an actual value of zero drives
/// the score to zero rather than dividing by it.
pub fn estimate_accuracy(series: &[MonthPoint]) -> f64 {
    if series.len() < 4 {
        return DEFAULT_ACCURACY;
    }
    let split = series.len() * 3 / 4;
    let (train, test) = series.split_at(split);
    let predicted = models::linear_projection(train, test.len());
    if predicted.len() != test.len() {
        return DEFAULT_ACCURACY;
    }
    let mape: f64 = test
        .iter()
        .zip(&predicted)
        .map(|(actual, pred)| {
            if actual.value == 0.0 {
                1.0
            } else {
                ((actual.value - pred) / actual.value).abs()
            }
        })
        .sum::<f64>()
        / test.len() as f64;
    (1.0 - mape).max(0.0).min(MAX_ACCURACY)
}

/// Heuristic confidence interval around the category's base confidence
/// level: `(base - 0.15, base + 0.05)`.
pub fn confidence_interval(category: ForecastCategory) -> (f64, f64) {
    let base = model_config(category).confidence_level;
    (base - 0.15, base + 0.05)
}
