use crate::models::{Agent, Availability, Facility, FacilityStatus};

/// Mutable per-run working state for an agent
///
/// The engine clones the caller's agents into these, so a run never
/// mutates caller-owned records and concurrent runs cannot alias.
#[derive(Debug, Clone)]
pub struct AgentState {
    pub agent: Agent,
    pub remaining_hours: f64,
    pub assigned_facility_ids: Vec<i64>,
}

impl AgentState {
    pub fn new(agent: Agent) -> Self {
        let remaining_hours = agent.remaining_hours();
        Self {
            agent,
            remaining_hours,
            assigned_facility_ids: Vec::new(),
        }
    }
}

/// Check whether an agent can still receive an assignment
///
/// Eligibility, not just capacity, enforces the one-to-one rule: an agent
/// drops out of this set the moment it holds its first assignment.
#[inline]
pub fn is_eligible(state: &AgentState) -> bool {
    state.agent.availability == Availability::Available
        && state.remaining_hours > 0.0
        && state.assigned_facility_ids.is_empty()
}

/// Check whether a facility participates in matching
#[inline]
pub fn is_open(facility: &Facility) -> bool {
    facility.status == FacilityStatus::Open
}
