//! Inbound payload adaptation
//!
//! Maps loosely-shaped external records onto the canonical `Agent` and
//! `Facility` model: auto-assigns missing ids, resolves status vocabularies
//! into closed enums, and defaults missing capacity. Field-name variance is
//! already handled by the serde aliases on the raw DTOs.

use crate::models::{Agent, Availability, Facility, FacilityStatus, RawAgent, RawFacility};

/// Default seed for auto-assigned agent ids
pub const AGENT_ID_SEED: i64 = 1000;
/// Default seed for auto-assigned facility ids
pub const FACILITY_ID_SEED: i64 = 2000;

/// Counter state for auto-assigned ids
///
/// Threaded explicitly through each adaptation call rather than living in
/// process-wide state, so concurrent requests cannot observe each other's
/// counters.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next_agent_id: i64,
    next_facility_id: i64,
}

impl IdAllocator {
    pub fn new(agent_seed: i64, facility_seed: i64) -> Self {
        Self {
            next_agent_id: agent_seed,
            next_facility_id: facility_seed,
        }
    }

    fn next_agent(&mut self) -> i64 {
        self.next_agent_id += 1;
        self.next_agent_id
    }

    fn next_facility(&mut self) -> i64 {
        self.next_facility_id += 1;
        self.next_facility_id
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new(AGENT_ID_SEED, FACILITY_ID_SEED)
    }
}

/// Normalizes raw inbound records into canonical ones
#[derive(Debug, Clone, Copy)]
pub struct Adapter {
    default_capacity_for_available: f64,
}

impl Adapter {
    pub fn new(default_capacity_for_available: f64) -> Self {
        Self {
            default_capacity_for_available,
        }
    }

    pub fn adapt_agents(&self, raw: Vec<RawAgent>, ids: &mut IdAllocator) -> Vec<Agent> {
        raw.into_iter().map(|a| self.adapt_agent(a, ids)).collect()
    }

    pub fn adapt_facilities(&self, raw: Vec<RawFacility>, ids: &mut IdAllocator) -> Vec<Facility> {
        raw.into_iter()
            .map(|f| self.adapt_facility(f, ids))
            .collect()
    }

    fn adapt_agent(&self, raw: RawAgent, ids: &mut IdAllocator) -> Agent {
        let availability = parse_availability(raw.availability.as_deref());

        // Missing capacity only defaults for agents that resolved to Available
        let capacity_hours = raw.capacity_hours.unwrap_or(match availability {
            Availability::Available => self.default_capacity_for_available,
            Availability::Unavailable => 0.0,
        });

        Agent {
            id: raw.id.unwrap_or_else(|| ids.next_agent()),
            latitude: raw.latitude.unwrap_or(0.0),
            longitude: raw.longitude.unwrap_or(0.0),
            availability,
            capacity_hours,
            assigned_hours: raw.assigned_hours.unwrap_or(0.0),
        }
    }

    fn adapt_facility(&self, raw: RawFacility, ids: &mut IdAllocator) -> Facility {
        Facility {
            id: raw.id.unwrap_or_else(|| ids.next_facility()),
            latitude: raw.latitude.unwrap_or(0.0),
            longitude: raw.longitude.unwrap_or(0.0),
            status: parse_facility_status(raw.status.as_deref()),
        }
    }
}

/// Map external availability vocabulary onto the closed enum
///
/// Unrecognized or missing statuses fall back to Unavailable.
fn parse_availability(raw: Option<&str>) -> Availability {
    let normalized = raw.map(|s| s.trim().to_ascii_uppercase());
    match normalized.as_deref() {
        Some("AVAILABLE") | Some("AVAILABLE_PART_TIME") => Availability::Available,
        Some("ON_LEAVE") | Some("UNAVAILABLE") => Availability::Unavailable,
        _ => Availability::Unavailable,
    }
}

/// Map external facility-status vocabulary onto the closed enum
///
/// Unrecognized or missing statuses fall back to Closed.
fn parse_facility_status(raw: Option<&str>) -> FacilityStatus {
    let normalized = raw.map(|s| s.trim().to_ascii_uppercase());
    match normalized.as_deref() {
        Some("OPEN") => FacilityStatus::Open,
        Some("CLOSED") | Some("OWNERSHIP_CHANGE") | Some("UNDER_MAINTENANCE") => {
            FacilityStatus::Closed
        }
        _ => FacilityStatus::Closed,
    }
}
