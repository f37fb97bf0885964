use std::sync::Arc;
use crate::config::Config;
use crate::queue::workers::ResearchWorker;

pub const SERVICE_NAME: &str = "Prism Intelligence Engine";
pub const SERVICE_DESCRIPTION: &str = "Dual-phase deep market research powered by sonar-deep-research";
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub worker: Arc<ResearchWorker>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let worker = Arc::new(ResearchWorker::from_config(&config));
        Self {
            config: Arc::new(config),
            worker,
        }
    }
}

// API Request/Response types

#[derive(Debug, serde::Deserialize)]
pub struct ProcessResearchRequest {
    pub job_id: String,
}

/// Sent back before any work starts; the caller gets nothing else on this channel
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ProcessResearchResponse {
    pub received: bool,
    pub job_id: String,
}

#[derive(Debug, serde::Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub engine: String,
    pub version: String,
    pub mode: String,
    pub timestamp: String,
}

#[derive(Debug, serde::Serialize)]
pub struct ServiceInfoResponse {
    pub service: String,
    pub description: String,
    pub version: String,
    pub endpoints: Vec<String>,
}
