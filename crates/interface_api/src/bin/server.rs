//! Aprova - API Server Binary
//!
//! Starts the HTTP API server for the expense approval system.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin aprova-api
//!
//! # Run with environment variables
//! API_HOST=127.0.0.1 API_PORT=9000 API_JWT_SECRET=... cargo run --bin aprova-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_JWT_SECRET` - JWT signing secret (required in production)
//! * `API_JWT_EXPIRATION_SECS` - JWT token expiration in seconds (default: 3600)
//! * `API_DIRECTORY_URL` - Country/currency directory endpoint
//! * `API_DIRECTORY_TIMEOUT_SECS` - Directory request timeout (default: 10)
//! * `API_FALLBACK_CURRENCY` - Display currency without a nationality (default: USD)
//! * `API_DEFAULT_MANAGER_CEILING` / `API_CEILING_CURRENCY` - Ceiling for
//!   managers without an explicit limit (default: 10000 INR)
//! * `API_FLOW_TTL_SECS` - Idle allowance for a login flow (default: 900)
//! * `API_SIGNUP_TTL_SECS` - Allowance for a flow awaiting signup approval (default: 604800)
//! * `API_SWEEP_INTERVAL_SECS` - How often expired flows and sessions are dropped (default: 60)
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use domain_currency::{CurrencyDirectoryPort, RestCountriesAdapter};
use interface_api::{config::ApiConfig, create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("loading API configuration")?;

    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        "Starting Aprova API Server"
    );

    let state = AppState::in_memory(config.clone())?;

    // Currency directory loads in the background; formatting degrades to
    // plain codes until it arrives
    let directory: Arc<dyn CurrencyDirectoryPort> = Arc::new(RestCountriesAdapter::new(
        &config.directory_url,
        config.directory_timeout(),
    )?);
    let currency_load = state.currency.spawn_load(directory);

    let sweeper = {
        let state = state.clone();
        let mut ticker = tokio::time::interval(config.sweep_interval());
        tokio::spawn(async move {
            loop {
                ticker.tick().await;
                state.evict_expired(chrono::Utc::now()).await;
            }
        })
    };

    let app = create_router(state);

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("invalid server address {}", config.server_addr()))?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    currency_load.cancel();
    sweeper.abort();
    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
