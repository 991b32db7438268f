use serde::{Deserialize, Serialize};

use crate::core::engine::MatchOutcome;
use crate::models::domain::{AgentProjection, EventRecord, FacilityProjection};

/// Response for the process-assignments endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessAssignmentsResponse {
    pub agents: Vec<AgentProjection>,
    pub facilities: Vec<FacilityProjection>,
    pub events: Vec<EventRecord>,
}

impl From<MatchOutcome> for ProcessAssignmentsResponse {
    fn from(outcome: MatchOutcome) -> Self {
        Self {
            agents: outcome.agents,
            facilities: outcome.facilities,
            events: outcome.events,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
