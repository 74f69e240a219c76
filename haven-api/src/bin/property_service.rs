use anyhow::Context;
use haven_api::{bootstrap, property_app, telemetry};
use haven_store::app_config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing("haven_api=debug,haven_property=debug,tower_http=debug");

    let config = Config::load("property").context("Failed to load config")?;
    tracing::info!("Starting property service on port {}", config.server.port);

    let state = bootstrap::property_state(&config).await?;
    bootstrap::serve(property_app(state), config.server.port).await
}
