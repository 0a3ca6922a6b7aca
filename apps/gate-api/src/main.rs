//! # Boxoffice Gate API
//!
//! HTTP server binary: storefront purchases in the front, gate check-in
//! at the door.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Gate API Server                                  │
//! │                                                                         │
//! │  Storefront ───► HTTP (8080) ───► Services ───► SQLite                 │
//! │  Gate scanner ──►                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use boxoffice_db::{Database, DbConfig};
use boxoffice_gate_api::auth::AuthVerifier;
use boxoffice_gate_api::config::ApiConfig;
use boxoffice_gate_api::routes;
use boxoffice_gate_api::services::{EventService, OrderService, RedemptionService};
use boxoffice_gate_api::token::TicketTokenCodec;
use boxoffice_gate_api::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Starting Boxoffice gate API server...");

    // Load configuration
    let config = ApiConfig::load()?;
    info!(
        port = config.http_port,
        database = %config.database_path,
        "Configuration loaded"
    );

    // Connect to database (runs migrations)
    let db = Database::new(DbConfig::new(config.database_path.clone())).await?;
    info!("Connected to SQLite");

    // Build shared state
    let codec = TicketTokenCodec::new(&config.ticket_secret);
    let state = Arc::new(AppState {
        auth: AuthVerifier::new(&config.auth_secret),
        events: EventService::new(db.clone()),
        orders: OrderService::new(db.clone(), codec.clone()),
        redemptions: RedemptionService::new(db.clone(), codec),
        db,
        config: config.clone(),
    });

    // Build server address
    let addr: SocketAddr = format!("0.0.0.0:{}", config.http_port).parse()?;
    info!(%addr, "Starting HTTP server");

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, routes::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
