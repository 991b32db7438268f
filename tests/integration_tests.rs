// Integration tests for dispatch-algo

use dispatch_algo::adapter::{Adapter, IdAllocator};
use dispatch_algo::core::{haversine_distance, MatchEngine};
use dispatch_algo::models::{
    Agent, Availability, EventKind, Facility, FacilityStatus, ProcessAssignmentsRequest,
};
use dispatch_algo::strategy::{verify_one_to_one, Orchestrator};
use dispatch_algo::validate::validate_all;

fn create_agent(id: i64, lat: f64, lon: f64) -> Agent {
    Agent {
        id,
        latitude: lat,
        longitude: lon,
        availability: Availability::Available,
        capacity_hours: 40.0,
        assigned_hours: 0.0,
    }
}

fn create_facility(id: i64, lat: f64, lon: f64) -> Facility {
    Facility {
        id,
        latitude: lat,
        longitude: lon,
        status: FacilityStatus::Open,
    }
}

#[test]
fn test_integration_end_to_end_pipeline() {
    // Raw payload in the legacy auditor/store vocabulary
    let raw = serde_json::json!({
        "auditorList": [
            { "auditorId": 11, "homeLat": 40.7128, "homeLon": -74.0060,
              "availabilityStatus": "AVAILABLE", "capacityHours": 40.0 },
            { "homeLat": 40.7500, "homeLon": -74.0500,
              "availabilityStatus": "ON_LEAVE" },
            { "auditorId": 13, "homeLat": 40.7300, "homeLon": -74.0200,
              "availabilityStatus": "AVAILABLE_PART_TIME" }
        ],
        "storeList": [
            { "storeId": 501, "locationLat": 40.7150, "locationLon": -74.0100,
              "storeStatus": "OPEN" },
            { "storeId": 502, "locationLat": 40.7310, "locationLon": -74.0210,
              "storeStatus": "OPEN" },
            { "locationLat": 40.7400, "locationLon": -74.0300,
              "storeStatus": "UNDER_MAINTENANCE" }
        ]
    });
    let request: ProcessAssignmentsRequest = serde_json::from_value(raw).unwrap();

    let adapter = Adapter::new(40.0);
    let mut ids = IdAllocator::default();
    let agents = adapter.adapt_agents(request.agents, &mut ids);
    let facilities = adapter.adapt_facilities(request.facilities, &mut ids);

    // Missing ids were allocated from the seeds
    assert_eq!(agents[1].id, 1001);
    assert_eq!(facilities[2].id, 2001);
    // ON_LEAVE with no capacity stays at zero
    assert_eq!(agents[1].availability, Availability::Unavailable);
    assert_eq!(agents[1].capacity_hours, 0.0);
    // Part-time maps to Available and picks up the default capacity
    assert_eq!(agents[2].availability, Availability::Available);
    assert_eq!(agents[2].capacity_hours, 40.0);

    validate_all(&agents, &facilities).unwrap();

    let orchestrator = Orchestrator::new(MatchEngine::default());
    let outcome = orchestrator.run(&agents, &facilities).unwrap();

    verify_one_to_one(&outcome).unwrap();

    // Store 501 is nearest agent 11, store 502 nearest agent 13; the
    // maintenance store never participates
    assert_eq!(outcome.facilities[0].assigned_agent_id, Some(11));
    assert_eq!(outcome.facilities[1].assigned_agent_id, Some(13));
    assert_eq!(outcome.facilities[2].assigned_agent_id, None);
    assert_eq!(outcome.facilities[2].status, FacilityStatus::Closed);
    assert_eq!(outcome.events.len(), 2);
    assert!(outcome
        .events
        .iter()
        .all(|e| e.kind == EventKind::Assignment));
}

#[test]
fn test_nearest_match_property_by_replay() {
    // Deterministic grid of agents and facilities
    let agents: Vec<Agent> = (0..10)
        .map(|i| {
            create_agent(
                i + 1,
                40.70 + (i as f64) * 0.013,
                -74.05 + ((i * 7) % 10) as f64 * 0.011,
            )
        })
        .collect();
    let facilities: Vec<Facility> = (0..8)
        .map(|i| {
            create_facility(
                2001 + i,
                40.71 + ((i * 3) % 8) as f64 * 0.017,
                -74.04 + (i as f64) * 0.009,
            )
        })
        .collect();

    let engine = MatchEngine::new(4.0);
    let outcome = engine.run(&agents, &facilities).unwrap();

    verify_one_to_one(&outcome).unwrap();

    // Replay the run: track eligibility ourselves and confirm every
    // assignment picked a closest eligible agent at its point in time
    let mut remaining: Vec<f64> = agents.iter().map(Agent::remaining_hours).collect();
    let mut taken: Vec<bool> = vec![false; agents.len()];

    for event in &outcome.events {
        let facility = facilities
            .iter()
            .find(|f| f.id == event.facility_id)
            .unwrap();
        match event.kind {
            EventKind::Assignment => {
                let chosen_id = event.assigned_agent_id.unwrap();
                let chosen_idx = agents.iter().position(|a| a.id == chosen_id).unwrap();
                let chosen_distance = haversine_distance(
                    facility.latitude,
                    facility.longitude,
                    agents[chosen_idx].latitude,
                    agents[chosen_idx].longitude,
                );

                for (idx, agent) in agents.iter().enumerate() {
                    if idx == chosen_idx || taken[idx] || remaining[idx] <= 0.0 {
                        continue;
                    }
                    let other = haversine_distance(
                        facility.latitude,
                        facility.longitude,
                        agent.latitude,
                        agent.longitude,
                    );
                    assert!(
                        other >= chosen_distance,
                        "agent {} at {}km beats chosen agent {} at {}km for facility {}",
                        agent.id,
                        other,
                        chosen_id,
                        chosen_distance,
                        facility.id
                    );
                }

                remaining[chosen_idx] =
                    (remaining[chosen_idx] - event.allocated_hours.unwrap()).max(0.0);
                taken[chosen_idx] = true;
            }
            EventKind::NoAvailableAgent => {
                // Every agent must have been taken or exhausted by now
                for idx in 0..agents.len() {
                    assert!(taken[idx] || remaining[idx] <= 0.0);
                }
            }
        }
    }
}

#[test]
fn test_more_facilities_than_agents() {
    let agents = vec![
        create_agent(1, 40.7128, -74.0060),
        create_agent(2, 40.7500, -74.0500),
    ];
    let facilities: Vec<Facility> = (0..5)
        .map(|i| create_facility(2001 + i, 40.71 + i as f64 * 0.01, -74.00))
        .collect();

    let engine = MatchEngine::default();
    let outcome = engine.run(&agents, &facilities).unwrap();

    let assigned = outcome
        .facilities
        .iter()
        .filter(|f| f.assigned_agent_id.is_some())
        .count();
    let pending = outcome
        .events
        .iter()
        .filter(|e| e.kind == EventKind::NoAvailableAgent)
        .count();

    assert_eq!(assigned, 2);
    assert_eq!(pending, 3);
    assert_eq!(outcome.events.len(), 5);
}

#[test]
fn test_empty_inputs_yield_empty_outcome() {
    let engine = MatchEngine::default();

    let outcome = engine.run(&[], &[]).unwrap();
    assert!(outcome.events.is_empty());

    let agents = vec![create_agent(1, 40.7128, -74.0060)];
    let outcome = engine.run(&agents, &[]).unwrap();
    assert!(outcome.events.is_empty());
    assert_eq!(outcome.agents.len(), 1);
    assert!(outcome.agents[0].assigned_facility_ids.is_empty());
}
