use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::metrics::relevance;
use crate::types::ForecastCategory;

/// A single historical financial data point. Immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialMetric {
    pub metric_id: Uuid,
    pub name: String,
    /// Decimal so ledger sums never drift.
    pub value: Decimal,
    pub period: DateTime<Utc>,
    /// Free-form category string, e.g. "revenue", "payroll"
    pub category: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

/// Ingestion shape for a historical metric; id and metadata are optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_id: Option<Uuid>,
    pub name: String,
    pub value: Decimal,
    pub period: DateTime<Utc>,
    pub category: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

/// Append-only store of historical metrics. Metrics are never mutated after
/// insertion; appends must be serialized by the owning engine.
#[derive(Debug, Clone, Default)]
pub struct MetricStore {
    metrics: Vec<FinancialMetric>,
}

impl MetricStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append ingested records, assigning ids where absent.
    /// Returns the number of metrics stored.
    pub fn add_records(&mut self, records: Vec<MetricRecord>) -> usize {
        let added = records.len();
        for record in records {
            self.metrics.push(FinancialMetric {
                metric_id: record.metric_id.unwrap_or_else(Uuid::new_v4),
                name: record.name,
                value: record.value,
                period: record.period,
                category: record.category,
                metadata: record.metadata,
            });
        }
        added
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FinancialMetric> {
        self.metrics.iter()
    }

    /// Metrics relevant to the given forecast category, per the keyword
    /// classifier. Order of insertion is preserved.
    pub fn relevant_for(&self, category: ForecastCategory) -> Vec<&FinancialMetric> {
        self.metrics
            .iter()
            .filter(|m| relevance::is_relevant(m, category))
            .collect()
    }
}
