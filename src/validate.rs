//! Post-adaptation record validation
//!
//! Runs between the adapter and the engine. Failures are local to one
//! record and carry enough context (record id and field) to identify it.

use thiserror::Error;

use crate::models::{Agent, Facility};

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("agent {id}: {field} {value} is out of range")]
    AgentCoordinate {
        id: i64,
        field: &'static str,
        value: f64,
    },
    #[error("agent {id}: {field} must be a finite non-negative number (got {value})")]
    AgentHours {
        id: i64,
        field: &'static str,
        value: f64,
    },
    #[error("facility {id}: {field} {value} is out of range")]
    FacilityCoordinate {
        id: i64,
        field: &'static str,
        value: f64,
    },
}

pub fn validate_agent(agent: &Agent) -> Result<(), ValidationError> {
    if !agent.latitude.is_finite() || !(-90.0..=90.0).contains(&agent.latitude) {
        return Err(ValidationError::AgentCoordinate {
            id: agent.id,
            field: "latitude",
            value: agent.latitude,
        });
    }
    if !agent.longitude.is_finite() || !(-180.0..=180.0).contains(&agent.longitude) {
        return Err(ValidationError::AgentCoordinate {
            id: agent.id,
            field: "longitude",
            value: agent.longitude,
        });
    }
    if !agent.capacity_hours.is_finite() || agent.capacity_hours < 0.0 {
        return Err(ValidationError::AgentHours {
            id: agent.id,
            field: "capacityHours",
            value: agent.capacity_hours,
        });
    }
    if !agent.assigned_hours.is_finite() || agent.assigned_hours < 0.0 {
        return Err(ValidationError::AgentHours {
            id: agent.id,
            field: "assignedHours",
            value: agent.assigned_hours,
        });
    }
    Ok(())
}

pub fn validate_facility(facility: &Facility) -> Result<(), ValidationError> {
    if !facility.latitude.is_finite() || !(-90.0..=90.0).contains(&facility.latitude) {
        return Err(ValidationError::FacilityCoordinate {
            id: facility.id,
            field: "latitude",
            value: facility.latitude,
        });
    }
    if !facility.longitude.is_finite() || !(-180.0..=180.0).contains(&facility.longitude) {
        return Err(ValidationError::FacilityCoordinate {
            id: facility.id,
            field: "longitude",
            value: facility.longitude,
        });
    }
    Ok(())
}

/// Validate every record, stopping at the first offending one
pub fn validate_all(agents: &[Agent], facilities: &[Facility]) -> Result<(), ValidationError> {
    for agent in agents {
        validate_agent(agent)?;
    }
    for facility in facilities {
        validate_facility(facility)?;
    }
    Ok(())
}
