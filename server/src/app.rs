//! Server lifecycle: connect, migrate, serve, drain.

use crate::config::Config;
use anyhow::Context;
use gatepass_core::TicketService;
use gatepass_core::environment::SystemClock;
use gatepass_postgres::PostgresStore;
use gatepass_web::{AppState, build_router};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Run the HTTP server until a shutdown signal arrives, then drain the pool.
///
/// # Errors
///
/// Returns an error if the database is unreachable, migrations fail, or the
/// listener cannot bind.
pub async fn run(config: Config) -> anyhow::Result<()> {
    gatepass_core::metrics::register_metrics();

    let store = PostgresStore::connect(&config.postgres)
        .await
        .context("Failed to connect to PostgreSQL")?;
    store
        .migrate()
        .await
        .context("Failed to run database migrations")?;

    let service = TicketService::new(Arc::new(store.clone()), Arc::new(SystemClock))
        .with_totp_config(config.totp);
    let app = build_router(AppState::new(service));

    let addr = config.server.address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("HTTP server stopped, draining connection pool...");
    let drain = Duration::from_secs(config.server.shutdown_timeout);
    if tokio::time::timeout(drain, store.close()).await.is_err() {
        warn!(timeout_secs = drain.as_secs(), "Connection pool drain timed out");
    }

    info!("Graceful shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        () = terminate => {
            info!("Received SIGTERM signal");
        }
    }
}
