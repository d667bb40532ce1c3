pub mod relevance;
pub mod series;
pub mod store;
