//! # Buttery API server
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Buttery API Server                             │
//! │                                                                         │
//! │  Dashboard ───► HTTP (3000) ───► Services ───► SQLite (buttery-db)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use anyhow::Context;
use buttery_api::{build_router, ApiConfig, AppState};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ApiConfig::load().context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_target(true)
        .init();

    info!("Starting Buttery API server...");
    info!(
        port = config.port,
        environment = config.environment.as_str(),
        db_url = %config.database_url,
        "Configuration loaded"
    );

    let addr = config.bind_address();
    let state = AppState::connect(config).await.context("Failed to open database")?;
    info!("Database ready");

    let app = build_router(state.clone());

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
