use serde::{Deserialize, Serialize};

/// Agent availability for a matching run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Availability {
    Available,
    Unavailable,
}

/// Facility operating status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FacilityStatus {
    Open,
    Closed,
}

/// Canonical agent record, adapted and validated upstream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    #[serde(rename = "agentId")]
    pub id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub availability: Availability,
    #[serde(rename = "capacityHours")]
    pub capacity_hours: f64,
    #[serde(rename = "assignedHours")]
    pub assigned_hours: f64,
}

impl Agent {
    /// Hours still workable before this run assigns anything
    pub fn remaining_hours(&self) -> f64 {
        (self.capacity_hours - self.assigned_hours).max(0.0)
    }
}

/// Canonical facility record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Facility {
    #[serde(rename = "facilityId")]
    pub id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub status: FacilityStatus,
}

/// Outcome kind for one processed Open facility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    #[serde(rename = "NO_AVAILABLE_AGENT")]
    NoAvailableAgent,
    #[serde(rename = "ASSIGNMENT")]
    Assignment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeStatus {
    #[serde(rename = "PENDING")]
    Pending,
    #[serde(rename = "IMPLEMENTED")]
    Implemented,
}

/// Append-only log entry, one per processed Open facility
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(rename = "sequenceId")]
    pub sequence_id: String,
    #[serde(rename = "facilityId")]
    pub facility_id: i64,
    pub kind: EventKind,
    /// Run-time capture, second resolution, UTC
    #[serde(rename = "triggeredOn")]
    pub triggered_on: String,
    #[serde(rename = "reportedBy")]
    pub reported_by: String,
    #[serde(rename = "outcomeStatus")]
    pub outcome_status: OutcomeStatus,
    #[serde(rename = "assignedAgentId", skip_serializing_if = "Option::is_none")]
    pub assigned_agent_id: Option<i64>,
    #[serde(rename = "distanceKm", skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(rename = "allocatedHours", skip_serializing_if = "Option::is_none")]
    pub allocated_hours: Option<f64>,
}

/// Per-agent output projection after a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentProjection {
    #[serde(rename = "agentId")]
    pub id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub availability: Availability,
    #[serde(rename = "capacityHours")]
    pub capacity_hours: f64,
    /// Original assigned hours plus hours used in this run, rounded to 3 decimals
    #[serde(rename = "assignedHours")]
    pub assigned_hours: f64,
    #[serde(rename = "remainingHours")]
    pub remaining_hours: f64,
    #[serde(rename = "assignedFacilityIds")]
    pub assigned_facility_ids: Vec<i64>,
}

/// Per-facility output projection; `assigned_agent_id` stays null when
/// the facility was Closed or no agent was eligible
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacilityProjection {
    #[serde(rename = "facilityId")]
    pub id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub status: FacilityStatus,
    #[serde(rename = "assignedAgentId")]
    pub assigned_agent_id: Option<i64>,
}
