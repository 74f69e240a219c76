use anyhow::Context;
use haven_api::{booking_app, bootstrap, telemetry};
use haven_store::app_config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing("haven_api=debug,haven_booking=debug,haven_store=info,tower_http=debug");

    let config = Config::load("booking").context("Failed to load config")?;
    tracing::info!("Starting booking service on port {}", config.server.port);

    let state = bootstrap::booking_state(&config).await?;
    bootstrap::serve(booking_app(state), config.server.port).await
}
