use crate::metrics::store::FinancialMetric;
use crate::types::ForecastCategory;

/// Keywords marking a metric as relevant to a forecast category.
///
/// Fails closed: categories without keywords (churn) match nothing, which
/// surfaces downstream as a no-historical-data error.
pub fn keywords(category: ForecastCategory) -> &'static [&'static str] {
    match category {
        ForecastCategory::Revenue => &["revenue", "sales", "subscription", "mrr", "arr"],
        ForecastCategory::Expenses => &["expenses", "costs", "spend", "payroll", "marketing"],
        ForecastCategory::CashFlow => &["cash_flow", "receipts", "payments", "balance"],
        ForecastCategory::Growth => &["growth", "customers", "users", "acquisition", "retention"],
        ForecastCategory::Churn => &[],
    }
}

/// Case-insensitive substring match against the metric's name or category.
/// Boolean inclusion only; there is no partial scoring.
pub fn is_relevant(metric: &FinancialMetric, category: ForecastCategory) -> bool {
    let name = metric.name.to_lowercase();
    let cat = metric.category.to_lowercase();
    keywords(category)
        .iter()
        .any(|kw| name.contains(kw) || cat.contains(kw))
}
