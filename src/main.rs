use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use std::sync::Arc;
use tracing::{info, warn};

use dispatch_algo::adapter::Adapter;
use dispatch_algo::config::Settings;
use dispatch_algo::routes::{self, assignments::AppState};
use dispatch_algo::services::PlanSink;
use dispatch_algo::strategy::Orchestrator;
use dispatch_algo::MatchEngine;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .content_type("application/json")
            .body(serde_json::to_string(self).unwrap())
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(
    err: error::JsonPayloadError,
    req: &actix_web::HttpRequest,
) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Initialize logging
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let subscriber = tracing_subscriber::fmt().with_target(false).with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting dispatch-algo assignment service...");

    // Load configuration
    let settings = Settings::load().unwrap_or_else(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    info!("Configuration loaded successfully");

    if settings.auth.api_key.is_none() {
        warn!("No API key configured; all assignment requests will be rejected");
    }

    // Build the matching engine and its orchestrating fallback wrapper.
    // No alternative strategy is wired in here; the orchestrator seam exists
    // for deployments that plug one in.
    let engine = MatchEngine::new(settings.matching.estimated_hours_per_facility);
    let orchestrator = Arc::new(Orchestrator::new(engine));

    info!(
        "Match engine initialized ({}h per facility)",
        settings.matching.estimated_hours_per_facility
    );

    let sink = Arc::new(PlanSink::new(settings.persistence.plan_path.clone()));
    info!("Plan sink writing to {}", sink.path().display());

    // Build application state
    let app_state = AppState {
        orchestrator,
        sink,
        adapter: Adapter::new(settings.adapter.default_capacity_for_available),
        agent_id_seed: settings.adapter.agent_id_seed,
        facility_id_seed: settings.adapter.facility_id_seed,
        api_key: settings.auth.api_key.clone(),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
