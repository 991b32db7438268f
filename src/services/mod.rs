// Service exports
pub mod plan_sink;

pub use plan_sink::{PlanSink, PlanSinkError};
