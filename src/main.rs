//! Reconciliation service entry point.

use transmission_reconciler::config::ServiceConfig;
use transmission_reconciler::http::{router, AppState};
use transmission_reconciler::observability::init_logging;
use transmission_reconciler::utils::MemoryRecordStore;
use transmission_reconciler::{BatchCoordinator, ReconciliationEngine};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServiceConfig::from_env()?;
    init_logging(config.log_format);

    let storage = match &config.seed_path {
        Some(path) => MemoryRecordStore::from_seed_file(path)?,
        None => MemoryRecordStore::new(),
    };
    tracing::info!(seed_path = ?config.seed_path, "record store ready");

    let coordinator = BatchCoordinator::new(ReconciliationEngine::new(storage));
    let app = router(AppState::new(coordinator));

    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
