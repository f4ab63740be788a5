// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::trend_service::TrendService;
use crate::infrastructure::config::{load_influx_config, load_server_config};
use crate::infrastructure::influx_repository::InfluxRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{asset_report, asset_trends, health_check, list_assets};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let influx_config = load_influx_config().context("Failed to load config/influx")?;
    let server_config = load_server_config().context("Failed to load config/server")?;

    // Create repository (infrastructure layer)
    let repository = Arc::new(InfluxRepository::new(
        influx_config.influx.host,
        influx_config.influx.token,
        influx_config.influx.database,
        influx_config.influx.retention_policy,
    ));

    // Create services (application layer)
    let trend_service = TrendService::new(repository);

    // Create application state
    let state = Arc::new(AppState {
        trend_service,
        default_hours: server_config.server.default_hours,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/assets", get(list_assets))
        .route("/assets/:id/trends", get(asset_trends))
        .route("/assets/:id/report", get(asset_report))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = server_config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address {}", server_config.server.bind))?;
    tracing::info!("Starting asset-trends service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
