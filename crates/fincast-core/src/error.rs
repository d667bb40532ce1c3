use thiserror::Error;
use uuid::Uuid;

use crate::types::ForecastCategory;

#[derive(Debug, Error)]
pub enum PlanningError {
    #[error("No historical data available for {0}")]
    NoHistoricalData(ForecastCategory),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: Uuid },

    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for PlanningError {
    fn from(e: serde_json::Error) -> Self {
        PlanningError::SerializationError(e.to_string())
    }
}
