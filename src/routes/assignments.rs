use std::sync::Arc;

use actix_web::{web, HttpRequest, HttpResponse, Responder};

use crate::adapter::{Adapter, IdAllocator};
use crate::models::{ErrorResponse, HealthResponse, ProcessAssignmentsRequest, ProcessAssignmentsResponse};
use crate::services::PlanSink;
use crate::strategy::Orchestrator;
use crate::validate::validate_all;

const API_KEY_HEADER: &str = "X-API-Key";

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub sink: Arc<PlanSink>,
    pub adapter: Adapter,
    pub agent_id_seed: i64,
    pub facility_id_seed: i64,
    pub api_key: Option<String>,
}

/// Configure all assignment-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/assignments/process", web::post().to(process_assignments));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Process assignments endpoint
///
/// POST /api/v1/assignments/process
///
/// Request body:
/// ```json
/// {
///   "agents": [{ "agentId": 1, "latitude": 40.7, "longitude": -74.0,
///                "availability": "Available", "capacityHours": 40.0 }],
///   "facilities": [{ "facilityId": 2001, "latitude": 40.72,
///                    "longitude": -74.01, "status": "Open" }]
/// }
/// ```
///
/// Legacy field names (auditors/stores vocabulary) are accepted as aliases.
async fn process_assignments(
    state: web::Data<AppState>,
    req: web::Json<ProcessAssignmentsRequest>,
    http_req: HttpRequest,
) -> impl Responder {
    if let Some(rejection) = check_api_key(&state, &http_req) {
        return rejection;
    }

    let request = req.into_inner();

    // Counter state is request-local; concurrent runs never share it
    let mut ids = IdAllocator::new(state.agent_id_seed, state.facility_id_seed);
    let agents = state.adapter.adapt_agents(request.agents, &mut ids);
    let facilities = state.adapter.adapt_facilities(request.facilities, &mut ids);

    if let Err(e) = validate_all(&agents, &facilities) {
        tracing::info!("Validation failed for process_assignments request: {}", e);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: e.to_string(),
            status_code: 400,
        });
    }

    tracing::info!(
        "Processing assignments for {} agents and {} facilities",
        agents.len(),
        facilities.len()
    );

    let outcome = match state.orchestrator.run(&agents, &facilities) {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("Assignment run failed: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Assignment failed".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    // Best-effort persistence; the response goes out either way
    if let Err(e) = state.sink.persist(&outcome).await {
        tracing::warn!("Failed to save assignment plan, continuing response: {}", e);
    }

    tracing::info!(
        "Assignment run produced {} events ({} assignments)",
        outcome.events.len(),
        outcome
            .facilities
            .iter()
            .filter(|f| f.assigned_agent_id.is_some())
            .count()
    );

    HttpResponse::Ok().json(ProcessAssignmentsResponse::from(outcome))
}

/// Reject the request unless it carries the configured API key
fn check_api_key(state: &AppState, req: &HttpRequest) -> Option<HttpResponse> {
    let Some(expected) = state.api_key.as_deref() else {
        tracing::warn!("No API key configured on server; rejecting request");
        return Some(HttpResponse::InternalServerError().json(ErrorResponse {
            error: "Server misconfiguration".to_string(),
            message: "API key not configured".to_string(),
            status_code: 500,
        }));
    };

    let provided = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    if provided != Some(expected) {
        return Some(HttpResponse::Unauthorized().json(ErrorResponse {
            error: "Unauthorized".to_string(),
            message: "Invalid or missing API key".to_string(),
            status_code: 401,
        }));
    }

    None
}
