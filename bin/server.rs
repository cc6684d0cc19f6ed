// Fintrack - Web Server
// Expense REST API with Axum

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{info, warn};

use clap::Parser;
use fintrack::config::{init_tracing, ServerConfig};
use fintrack::{router, Database, VERSION};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;
    let config = ServerConfig::parse();

    // Open database (created with its schema on first run)
    let db = Database::open(&config.db_path)?;
    info!(version = VERSION, "Database opened: {}", db.path().display());

    let app = router(db);

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Fintrack API running on http://{}", addr);
    info!("Expenses: http://{}/expenses/", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => warn!("Received Ctrl+C, shutting down"),
        _ = terminate => warn!("Received SIGTERM, shutting down"),
    }
}
