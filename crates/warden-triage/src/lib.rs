pub mod actions;
pub mod engine;

pub use actions::RemovalOutcome;
pub use engine::{Disposition, TriageEngine};
