// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Agent, AgentProjection, Availability, EventKind, EventRecord, Facility, FacilityProjection,
    FacilityStatus, OutcomeStatus,
};
pub use requests::{ProcessAssignmentsRequest, RawAgent, RawFacility};
pub use responses::{ErrorResponse, HealthResponse, ProcessAssignmentsResponse};
