use serde::{Deserialize, Serialize};

/// Request to process assignments
///
/// External systems disagree on list names, so the canonical fields carry
/// aliases for every vocabulary seen in the wild.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessAssignmentsRequest {
    #[serde(
        default,
        alias = "auditors",
        alias = "auditorList",
        alias = "employees"
    )]
    pub agents: Vec<RawAgent>,
    #[serde(default, alias = "stores", alias = "storeList", alias = "locations")]
    pub facilities: Vec<RawFacility>,
}

/// Agent record exactly as an external system sends it, before adaptation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawAgent {
    #[serde(
        default,
        alias = "agent_id",
        alias = "agentId",
        alias = "auditor_id",
        alias = "auditorId"
    )]
    pub id: Option<i64>,
    #[serde(default, alias = "homeLat", alias = "locationLat", alias = "lat")]
    pub latitude: Option<f64>,
    #[serde(default, alias = "homeLon", alias = "locationLon", alias = "lon")]
    pub longitude: Option<f64>,
    #[serde(
        default,
        alias = "availability_status",
        alias = "availabilityStatus",
        alias = "status"
    )]
    pub availability: Option<String>,
    #[serde(
        default,
        rename = "capacityHours",
        alias = "capacity_hours",
        alias = "workloadCapacityHours",
        alias = "capacity"
    )]
    pub capacity_hours: Option<f64>,
    #[serde(
        default,
        rename = "assignedHours",
        alias = "assigned_hours",
        alias = "currentAssignedHours",
        alias = "currentAssigned"
    )]
    pub assigned_hours: Option<f64>,
}

/// Facility record exactly as an external system sends it, before adaptation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawFacility {
    #[serde(
        default,
        alias = "facility_id",
        alias = "facilityId",
        alias = "store_id",
        alias = "storeId"
    )]
    pub id: Option<i64>,
    #[serde(default, alias = "locationLat", alias = "homeLat", alias = "lat")]
    pub latitude: Option<f64>,
    #[serde(default, alias = "locationLon", alias = "homeLon", alias = "lon")]
    pub longitude: Option<f64>,
    #[serde(
        default,
        alias = "facility_status",
        alias = "facilityStatus",
        alias = "store_status",
        alias = "storeStatus",
        alias = "status"
    )]
    pub status: Option<String>,
}
