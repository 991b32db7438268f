use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::distance::haversine_distance;
use crate::core::eligibility::{is_eligible, is_open, AgentState};
use crate::models::{
    Agent, AgentProjection, EventKind, EventRecord, Facility, FacilityProjection, OutcomeStatus,
};

/// Default hours allocated per facility assignment
pub const DEFAULT_ESTIMATED_HOURS_PER_FACILITY: f64 = 4.0;

const REPORTED_BY: &str = "system";

/// Engine precondition failure
///
/// The run is atomic: on error nothing is returned and, since the engine
/// only mutates its own working copies, nothing is observable either.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("agent {id}: field '{field}' is not a finite in-range number")]
    InvalidAgent { id: i64, field: &'static str },
    #[error("facility {id}: field '{field}' is not a finite in-range number")]
    InvalidFacility { id: i64, field: &'static str },
}

/// Result of one matching run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub agents: Vec<AgentProjection>,
    pub facilities: Vec<FacilityProjection>,
    pub events: Vec<EventRecord>,
}

/// Deterministic greedy one-to-one matching engine
///
/// # Pipeline
/// 1. Guard preconditions (finite, in-range numerics)
/// 2. Clone inputs into private working state
/// 3. Single pass over Open facilities in input order: nearest eligible
///    agent wins, capacity is decremented, an event is appended
/// 4. Project agents, facilities, and the event log into the outcome
///
/// There is no backtracking or re-optimization: an assignment, once made,
/// is never revisited within a run.
#[derive(Debug, Clone, Copy)]
pub struct MatchEngine {
    estimated_hours_per_facility: f64,
}

impl MatchEngine {
    pub fn new(estimated_hours_per_facility: f64) -> Self {
        Self {
            estimated_hours_per_facility,
        }
    }

    /// Assign each Open facility to at most one eligible agent
    ///
    /// # Arguments
    /// * `agents` - validated agent records, in input order
    /// * `facilities` - validated facility records, in input order
    ///
    /// # Returns
    /// MatchOutcome with agent/facility projections and the ordered event log
    pub fn run(
        &self,
        agents: &[Agent],
        facilities: &[Facility],
    ) -> Result<MatchOutcome, EngineError> {
        check_preconditions(agents, facilities)?;

        // Private working copies; the caller's records are never touched
        let mut agent_states: Vec<AgentState> =
            agents.iter().cloned().map(AgentState::new).collect();
        let mut facilities_out: Vec<FacilityProjection> = facilities
            .iter()
            .map(|f| FacilityProjection {
                id: f.id,
                latitude: f.latitude,
                longitude: f.longitude,
                status: f.status,
                assigned_agent_id: None,
            })
            .collect();
        let mut events: Vec<EventRecord> = Vec::new();

        for (idx, facility) in facilities.iter().enumerate() {
            if !is_open(facility) {
                continue;
            }

            let nearest = nearest_eligible(&agent_states, facility);

            let Some((chosen_idx, distance_km)) = nearest else {
                events.push(EventRecord {
                    sequence_id: sequence_id(events.len() + 1),
                    facility_id: facility.id,
                    kind: EventKind::NoAvailableAgent,
                    triggered_on: timestamp(),
                    reported_by: REPORTED_BY.to_string(),
                    outcome_status: OutcomeStatus::Pending,
                    assigned_agent_id: None,
                    distance_km: None,
                    allocated_hours: None,
                });
                continue;
            };

            let chosen = &mut agent_states[chosen_idx];
            let allocated_hours = self
                .estimated_hours_per_facility
                .min(chosen.remaining_hours);
            chosen.remaining_hours = (chosen.remaining_hours - allocated_hours).max(0.0);
            chosen.assigned_facility_ids.push(facility.id);
            facilities_out[idx].assigned_agent_id = Some(chosen.agent.id);

            events.push(EventRecord {
                sequence_id: sequence_id(events.len() + 1),
                facility_id: facility.id,
                kind: EventKind::Assignment,
                triggered_on: timestamp(),
                reported_by: REPORTED_BY.to_string(),
                outcome_status: OutcomeStatus::Implemented,
                assigned_agent_id: Some(chosen.agent.id),
                distance_km: Some(round_to(distance_km, 4)),
                allocated_hours: Some(round_to(allocated_hours, 3)),
            });
        }

        let agents_out = agent_states
            .into_iter()
            .map(|state| {
                let used_hours = state.agent.capacity_hours - state.remaining_hours;
                AgentProjection {
                    id: state.agent.id,
                    latitude: state.agent.latitude,
                    longitude: state.agent.longitude,
                    availability: state.agent.availability,
                    capacity_hours: state.agent.capacity_hours,
                    assigned_hours: round_to(state.agent.assigned_hours + used_hours, 3),
                    remaining_hours: round_to(state.remaining_hours, 3),
                    assigned_facility_ids: state.assigned_facility_ids,
                }
            })
            .collect();

        Ok(MatchOutcome {
            agents: agents_out,
            facilities: facilities_out,
            events,
        })
    }
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::new(DEFAULT_ESTIMATED_HOURS_PER_FACILITY)
    }
}

/// Find the eligible agent nearest to a facility
///
/// Exact distance ties break toward the lower agent id, so the result
/// never depends on input ordering.
fn nearest_eligible(agent_states: &[AgentState], facility: &Facility) -> Option<(usize, f64)> {
    let mut nearest: Option<(usize, f64)> = None;

    for (idx, state) in agent_states.iter().enumerate() {
        if !is_eligible(state) {
            continue;
        }

        let distance = haversine_distance(
            facility.latitude,
            facility.longitude,
            state.agent.latitude,
            state.agent.longitude,
        );

        nearest = match nearest {
            None => Some((idx, distance)),
            Some((best_idx, best_distance)) => {
                let closer = distance < best_distance
                    || (distance == best_distance
                        && state.agent.id < agent_states[best_idx].agent.id);
                if closer {
                    Some((idx, distance))
                } else {
                    Some((best_idx, best_distance))
                }
            }
        };
    }

    nearest
}

fn check_preconditions(agents: &[Agent], facilities: &[Facility]) -> Result<(), EngineError> {
    for agent in agents {
        let invalid = |field| EngineError::InvalidAgent {
            id: agent.id,
            field,
        };
        if !agent.latitude.is_finite() || !(-90.0..=90.0).contains(&agent.latitude) {
            return Err(invalid("latitude"));
        }
        if !agent.longitude.is_finite() || !(-180.0..=180.0).contains(&agent.longitude) {
            return Err(invalid("longitude"));
        }
        if !agent.capacity_hours.is_finite() || agent.capacity_hours < 0.0 {
            return Err(invalid("capacityHours"));
        }
        if !agent.assigned_hours.is_finite() || agent.assigned_hours < 0.0 {
            return Err(invalid("assignedHours"));
        }
    }

    for facility in facilities {
        let invalid = |field| EngineError::InvalidFacility {
            id: facility.id,
            field,
        };
        if !facility.latitude.is_finite() || !(-90.0..=90.0).contains(&facility.latitude) {
            return Err(invalid("latitude"));
        }
        if !facility.longitude.is_finite() || !(-180.0..=180.0).contains(&facility.longitude) {
            return Err(invalid("longitude"));
        }
    }

    Ok(())
}

/// Run-local event counter formatted as D001, D002, ...
fn sequence_id(n: usize) -> String {
    format!("D{:03}", n)
}

fn timestamp() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Availability, FacilityStatus};

    fn create_agent(id: i64, lat: f64, lon: f64, capacity: f64) -> Agent {
        Agent {
            id,
            latitude: lat,
            longitude: lon,
            availability: Availability::Available,
            capacity_hours: capacity,
            assigned_hours: 0.0,
        }
    }

    fn create_facility(id: i64, lat: f64, lon: f64, status: FacilityStatus) -> Facility {
        Facility {
            id,
            latitude: lat,
            longitude: lon,
            status,
        }
    }

    #[test]
    fn test_assigns_nearest_agent() {
        let engine = MatchEngine::default();
        let agents = vec![
            create_agent(1, 40.7128, -74.0060, 40.0), // New York
            create_agent(2, 34.0522, -118.2437, 40.0), // Los Angeles
        ];
        let facilities = vec![create_facility(2001, 40.73, -74.00, FacilityStatus::Open)];

        let outcome = engine.run(&agents, &facilities).unwrap();

        assert_eq!(outcome.facilities[0].assigned_agent_id, Some(1));
        assert_eq!(outcome.events.len(), 1);
        assert_eq!(outcome.events[0].kind, EventKind::Assignment);
        assert_eq!(outcome.events[0].outcome_status, OutcomeStatus::Implemented);
        assert_eq!(outcome.events[0].assigned_agent_id, Some(1));
    }

    #[test]
    fn test_no_eligible_agent_records_pending_event() {
        let engine = MatchEngine::default();
        let agents = vec![Agent {
            availability: Availability::Unavailable,
            ..create_agent(1, 40.7128, -74.0060, 40.0)
        }];
        let facilities = vec![create_facility(2001, 40.73, -74.00, FacilityStatus::Open)];

        let outcome = engine.run(&agents, &facilities).unwrap();

        assert_eq!(outcome.facilities[0].assigned_agent_id, None);
        assert_eq!(outcome.events.len(), 1);
        assert_eq!(outcome.events[0].kind, EventKind::NoAvailableAgent);
        assert_eq!(outcome.events[0].outcome_status, OutcomeStatus::Pending);
        assert_eq!(outcome.events[0].sequence_id, "D001");
        assert!(outcome.events[0].distance_km.is_none());
    }

    #[test]
    fn test_one_to_one_blocks_second_assignment() {
        let engine = MatchEngine::default();
        let agents = vec![create_agent(1, 40.7128, -74.0060, 40.0)];
        let facilities = vec![
            create_facility(2001, 40.72, -74.00, FacilityStatus::Open), // nearer, first
            create_facility(2002, 40.90, -74.20, FacilityStatus::Open),
        ];

        let outcome = engine.run(&agents, &facilities).unwrap();

        assert_eq!(outcome.facilities[0].assigned_agent_id, Some(1));
        assert_eq!(outcome.facilities[1].assigned_agent_id, None);
        assert_eq!(outcome.events[0].kind, EventKind::Assignment);
        assert_eq!(outcome.events[1].kind, EventKind::NoAvailableAgent);
        assert_eq!(outcome.agents[0].assigned_facility_ids, vec![2001]);
    }

    #[test]
    fn test_allocation_capped_by_remaining_hours() {
        let engine = MatchEngine::new(4.0);
        let agents = vec![create_agent(1, 40.7128, -74.0060, 2.0)];
        let facilities = vec![create_facility(2001, 40.72, -74.00, FacilityStatus::Open)];

        let outcome = engine.run(&agents, &facilities).unwrap();

        assert_eq!(outcome.events[0].allocated_hours, Some(2.0));
        assert_eq!(outcome.agents[0].remaining_hours, 0.0);
    }

    #[test]
    fn test_closed_facility_passes_through_unassigned() {
        let engine = MatchEngine::default();
        let agents = vec![create_agent(1, 40.7128, -74.0060, 40.0)];
        let facilities = vec![create_facility(2001, 40.72, -74.00, FacilityStatus::Closed)];

        let outcome = engine.run(&agents, &facilities).unwrap();

        assert!(outcome.events.is_empty());
        assert_eq!(outcome.facilities.len(), 1);
        assert_eq!(outcome.facilities[0].status, FacilityStatus::Closed);
        assert_eq!(outcome.facilities[0].assigned_agent_id, None);
    }

    #[test]
    fn test_empty_input_is_not_an_error() {
        let engine = MatchEngine::default();

        let outcome = engine.run(&[], &[]).unwrap();

        assert!(outcome.agents.is_empty());
        assert!(outcome.facilities.is_empty());
        assert!(outcome.events.is_empty());
    }

    #[test]
    fn test_distance_tie_breaks_toward_lower_agent_id() {
        let engine = MatchEngine::default();
        // Two agents at the same point, listed high id first
        let agents = vec![
            create_agent(7, 40.7128, -74.0060, 40.0),
            create_agent(3, 40.7128, -74.0060, 40.0),
        ];
        let facilities = vec![create_facility(2001, 40.72, -74.00, FacilityStatus::Open)];

        let outcome = engine.run(&agents, &facilities).unwrap();

        assert_eq!(outcome.facilities[0].assigned_agent_id, Some(3));
    }

    #[test]
    fn test_non_finite_input_fails_the_run() {
        let engine = MatchEngine::default();
        let agents = vec![create_agent(1, f64::NAN, -74.0060, 40.0)];
        let facilities = vec![create_facility(2001, 40.72, -74.00, FacilityStatus::Open)];

        let err = engine.run(&agents, &facilities).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidAgent {
                id: 1,
                field: "latitude"
            }
        ));
    }

    #[test]
    fn test_out_of_range_facility_coordinate_fails_the_run() {
        let engine = MatchEngine::default();
        let agents = vec![create_agent(1, 40.7128, -74.0060, 40.0)];
        let facilities = vec![create_facility(2001, 40.72, -200.0, FacilityStatus::Open)];

        let err = engine.run(&agents, &facilities).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidFacility {
                id: 2001,
                field: "longitude"
            }
        ));
    }

    #[test]
    fn test_sequence_id_format() {
        assert_eq!(sequence_id(1), "D001");
        assert_eq!(sequence_id(42), "D042");
        assert_eq!(sequence_id(1000), "D1000");
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round_to(12.34567, 4), 12.3457);
        assert_eq!(round_to(1.23456, 3), 1.235);
    }
}
