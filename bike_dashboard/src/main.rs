use std::net::SocketAddr;

use anyhow::Context;
use bike_dashboard::{build_app_router, AppState, DashboardConfig, DashboardContext};
use bike_forecast::Dataset;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bike_dashboard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = DashboardConfig::from_env().context("Invalid configuration")?;
    tracing::info!(host = %config.host, port = config.port, order = %config.order, "Loaded configuration");

    // --- Dataset ---
    let dataset = Dataset::from_csv(&config.data_path).with_context(|| {
        format!("Failed to load bike data from {}", config.data_path.display())
    })?;
    let (first, last) = dataset.date_range();
    tracing::info!(records = dataset.len(), %first, %last, "Dataset loaded");

    // --- Forecast ---
    let context = DashboardContext::build(dataset, &config)
        .with_context(|| format!("Failed to fit ARIMA{} to daily demand", config.order))?;

    // --- Router ---
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", config.host, config.port))?;
    let app = build_app_router(AppState::new(context, config));

    tracing::info!(%addr, "Starting server");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Wait for Ctrl-C (and SIGTERM on Unix) to initiate graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
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

    tracing::info!("Shutdown signal received");
}
