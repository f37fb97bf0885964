//! API Routes
//!
//! - `POST /process-research` - Start a research job (acknowledged immediately)
//! - `GET /health` - Health check
//! - `GET /` - Service description

pub mod health;
pub mod research;

use axum::Router;
use crate::models::AppState;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    Router::new()
        .merge(research::router(state.clone()))
        .merge(health::router(state))
        .layer(TraceLayer::new_for_http())
}
