//! # Navratna API Server
//!
//! REST/JSON back office for a gemstone trading business.
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. init tracing (RUST_LOG, default info)                               │
//! │  2. Config::from_env()                                                  │
//! │  3. Database::new() ─► SQLite pool + migrations                         │
//! │  4. build_router(AppState)                                              │
//! │  5. serve until Ctrl+C / SIGTERM, then close the pool                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use navratna_api::{build_router, AppState, Config};
use navratna_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    info!("Starting Navratna API server...");

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        addr = %config.bind_address(),
        db_path = %config.db_path.display(),
        business = %config.seller.business_name,
        "Configuration loaded"
    );

    let db_config = if config.db_path.as_os_str() == ":memory:" {
        DbConfig::in_memory()
    } else {
        DbConfig::new(config.db_path.clone())
    };
    let db = Database::new(db_config)
        .await
        .context("Failed to open database")?;

    let addr = config.bind_address();
    let app = build_router(AppState::new(db.clone(), config));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,navratna=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(?e, "Failed to listen for Ctrl+C");
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
                error!(?e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
