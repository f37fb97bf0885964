// Prism Worker - background market-research job processor

pub mod config;
pub mod models;
pub mod types;
pub mod agents;
pub mod llm;
pub mod storage;   // External job store client
pub mod queue;     // Job model and the research worker
pub mod routes;
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}

/// Bind the HTTP listener. `host` may be an IP address or a host name.
pub async fn bind_listener(server: &config::ServerConfig) -> anyhow::Result<tokio::net::TcpListener> {
    use anyhow::Context;

    tokio::net::TcpListener::bind((server.host.as_str(), server.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", server.host, server.port))
}
