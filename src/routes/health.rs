use axum::{Router, routing::get, Json, extract::State, response::Json as ResponseJson};
use crate::models::{AppState, HealthResponse, ServiceInfoResponse, SERVICE_DESCRIPTION, SERVICE_NAME, SERVICE_VERSION};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/", get(service_info))
        .with_state(state)
}

async fn health_check(State(state): State<AppState>) -> ResponseJson<HealthResponse> {
    let response = HealthResponse {
        status: "ok".to_string(),
        engine: SERVICE_NAME.to_string(),
        version: SERVICE_VERSION.to_string(),
        mode: state.worker.mode().to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    Json(response)
}

async fn service_info() -> ResponseJson<ServiceInfoResponse> {
    Json(ServiceInfoResponse {
        service: SERVICE_NAME.to_string(),
        description: SERVICE_DESCRIPTION.to_string(),
        version: SERVICE_VERSION.to_string(),
        endpoints: vec!["/process-research".to_string(), "/health".to_string()],
    })
}
