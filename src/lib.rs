//! Dispatch Algo - deterministic assignment service for field audit dispatch
//!
//! This library provides the matching core used by the dispatch service:
//! a greedy nearest-agent engine that pairs each open facility with at most
//! one available agent, records an auditable event trail, and never assigns
//! an agent twice in a run.

pub mod adapter;
pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;
pub mod strategy;
pub mod validate;

// Re-export commonly used types
pub use crate::core::{haversine_distance, MatchEngine, MatchOutcome};
pub use models::{
    Agent, Availability, EventKind, EventRecord, Facility, FacilityStatus, OutcomeStatus,
    ProcessAssignmentsRequest, ProcessAssignmentsResponse,
};
