pub mod engine;
pub mod error;
pub mod forecast;
pub mod metrics;
pub mod plan;
pub mod report;
pub mod types;

pub use engine::FinancialPlanningEngine;
pub use error::PlanningError;
pub use types::*;

/// Standard result type for all fincast operations
pub type PlanningResult<T> = Result<T, PlanningError>;
