use tracing::info;
use prism_worker::{config::Config, routes::create_router, utils::init_logger, bind_listener, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing; keep the guard alive so file logs flush
    let _log_guard = init_logger(&config.logging);
    info!(
        port = config.server.port,
        mode = %config.research.mode,
        summarizer = config.summarizer.api_key.is_some(),
        "Configuration loaded"
    );

    // Create shared state
    let state = AppState::new(config);
    let listener = bind_listener(&state.config.server).await?;

    // Create router
    let app = create_router(state);

    // Start server
    info!(
        "Prism Intelligence Engine listening on {}",
        listener.local_addr()?
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
