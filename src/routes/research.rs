use axum::{
    Router,
    routing::post,
    Json,
    extract::State,
    response::Json as ResponseJson,
};
use crate::models::{AppState, ProcessResearchRequest, ProcessResearchResponse};
use tracing::info;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/process-research", post(process_research))
        .with_state(state)
}

/// Acknowledge immediately and run the job on a detached task
async fn process_research(
    State(state): State<AppState>,
    Json(request): Json<ProcessResearchRequest>,
) -> ResponseJson<ProcessResearchResponse> {
    info!(job_id = %request.job_id, "Research request received");

    // Not awaited: the run continues after this response is sent
    state.worker.spawn(request.job_id.clone());

    Json(ProcessResearchResponse {
        received: true,
        job_id: request.job_id,
    })
}
