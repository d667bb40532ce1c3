pub mod render;

pub use render::{render_report, PlanningReport};
