use anyhow::Context;
use haven_api::{bootstrap, gateway_app, telemetry};
use haven_store::app_config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing("haven_api=debug,haven_store=info,tower_http=debug");

    let config = Config::load("gateway").context("Failed to load config")?;
    tracing::info!("Starting gateway on port {}", config.server.port);

    let state = bootstrap::gateway_state(&config)?;
    bootstrap::serve(gateway_app(state), config.server.port).await
}
