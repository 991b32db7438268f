// Core algorithm exports
pub mod distance;
pub mod eligibility;
pub mod engine;

pub use distance::haversine_distance;
pub use eligibility::{is_eligible, is_open, AgentState};
pub use engine::{MatchEngine, MatchOutcome, EngineError, DEFAULT_ESTIMATED_HOURS_PER_FACILITY};
