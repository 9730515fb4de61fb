//! ceye-an - Deforestation Analysis Microservice
//!
//! Endpoint: POST /analyze-deforestation

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;

use ceye_an::services::SentinelHubClient;
use ceye_an::{build_router, AppState};
use ceye_common::config::ServiceConfig;

#[derive(Debug, Parser)]
#[command(name = "ceye-an", about = "CarbonEye deforestation analysis service")]
struct Args {
    /// HTTP listen port (overrides env and config file)
    #[arg(long)]
    port: Option<u16>,

    /// Fixed seed for the synthetic analysis stream (deterministic replay)
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Credentials commonly live in a .env during development
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting CarbonEye Analysis (ceye-an) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let args = Args::parse();
    let config = ServiceConfig::resolve(args.port, args.seed)?;
    let port = config.port;

    let provider = SentinelHubClient::new(&config)
        .map_err(|e| anyhow::anyhow!("Failed to build provider client: {e}"))?;

    let state = AppState::new(config, Arc::new(provider));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Listening on http://0.0.0.0:{port}");
    info!("Endpoint available: POST /analyze-deforestation");
    info!("Health check: http://localhost:{port}/health");

    axum::serve(listener, app).await?;

    Ok(())
}
