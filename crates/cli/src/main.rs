//! Health diary gateway entry point.
//!
//! This binary is the composition root for the entire system. Responsibilities:
//!
//! 1. **Load configuration** from the environment (see [`config::GatewayConfig`]).
//! 2. **Wire observability**: JSON `tracing` output, plus an OpenTelemetry OTLP
//!    exporter when `OTEL_ENABLED=true`.
//! 3. **Construct infrastructure**: the HTTP classification and storage
//!    clients, injected into the orchestrator and the aggregator.
//! 4. **Serve** the gateway routes until Ctrl-C or SIGTERM.

mod config;
mod telemetry;

use std::sync::Arc;

use anyhow::{Context, Result};
use collaborators::{HttpClassifier, HttpComplaintStore};
use diary::{ComplaintIntake, HealthIndicatorService, SystemClock};
use gateway::AppState;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::config::GatewayConfig;
use crate::telemetry::{init_telemetry, shutdown_telemetry, TelemetryConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let config = GatewayConfig::from_env().context("Failed to load configuration")?;

    let telemetry = init_telemetry(&TelemetryConfig {
        service_name: &config.otel_service_name,
        otel_endpoint: &config.otel_endpoint,
        otel_enabled: config.otel_enabled,
        log_level: &config.log_level,
    })
    .context("Failed to initialize telemetry")?;

    info!(
        nlp_service_url = %config.nlp_service_url,
        complaints_service_url = %config.complaints_service_url,
        timeout_secs = config.collaborator_timeout_secs,
        otel_enabled = config.otel_enabled,
        "Starting health diary gateway"
    );

    let result = run(&config).await;
    if let Err(e) = &result {
        error!("Gateway stopped with an error: {e:#}");
    }

    shutdown_telemetry(telemetry);
    result
}

async fn run(config: &GatewayConfig) -> Result<()> {
    let classifier = HttpClassifier::new(&config.classification_endpoint()?)
        .context("Failed to build classification client")?;
    let store = Arc::new(
        HttpComplaintStore::new(&config.storage_endpoint()?)
            .context("Failed to build storage client")?,
    );

    let state = AppState::new(
        ComplaintIntake::new(Arc::new(classifier), store.clone()),
        HealthIndicatorService::new(store, Arc::new(SystemClock)),
    );

    let addr = config
        .bind_address()
        .with_context(|| format!("Invalid bind address '{}'", config.bind_address))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    gateway::serve(listener, state, shutdown_signal()).await?;
    info!("Gateway shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
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
                error!(error = %e, "Failed to listen for SIGTERM");
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
    info!("Shutdown signal received");
}
