use chrono::{Datelike, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::metrics::store::FinancialMetric;

/// One calendar month of summed metric values, converted to f64 for
/// modeling. Ledger precision is restored at the combination boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthPoint {
    /// First day of the calendar month.
    pub month: NaiveDate,
    pub value: f64,
}

/// Bucket metrics into monthly totals, ordered by calendar month ascending.
///
/// Multiple metrics in the same month are summed (in Decimal, converted
/// once). Months with no data are simply absent, never zero-filled. The
/// ordering is load-bearing: fitters index time as 0..N-1.
pub fn aggregate_monthly(metrics: &[&FinancialMetric]) -> Vec<MonthPoint> {
    let mut buckets: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for metric in metrics {
        let day = metric.period.date_naive();
        let month = day.with_day(1).unwrap_or(day);
        *buckets.entry(month).or_insert(Decimal::ZERO) += metric.value;
    }
    buckets
        .into_iter()
        .map(|(month, total)| MonthPoint {
            month,
            value: total.to_f64().unwrap_or(0.0),
        })
        .collect()
}
