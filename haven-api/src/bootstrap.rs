//! Wiring shared by the three binaries: state from config, then serve.

use anyhow::Context;
use axum::Router;
use haven_booking::BookingService;
use haven_core::{BookingRepository, PropertyRepository};
use haven_property::PropertyService;
use haven_store::app_config::Config;
use haven_store::{
    BookingServiceClient, DbClient, InMemoryBookingRepository, InMemoryPropertyRepository,
    PgBookingRepository, PgPropertyRepository, PropertyServiceClient,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::state::{BookingAppState, GatewayState, PropertyAppState};

pub async fn property_state(config: &Config) -> anyhow::Result<PropertyAppState> {
    let repo: Arc<dyn PropertyRepository> = match DbClient::from_config(&config.database)
        .await
        .context("Failed to connect to Postgres")?
    {
        Some(db) => {
            db.migrate_property_schema().await?;
            Arc::new(PgPropertyRepository::new(db.pool))
        }
        None => {
            warn!("No database.url configured, properties are kept in memory");
            Arc::new(InMemoryPropertyRepository::new())
        }
    };

    let service = Arc::new(PropertyService::new(repo));
    Ok(PropertyAppState::new(service, config.internal.auth_key.clone()))
}

pub async fn booking_state(config: &Config) -> anyhow::Result<BookingAppState> {
    let repo: Arc<dyn BookingRepository> = match DbClient::from_config(&config.database)
        .await
        .context("Failed to connect to Postgres")?
    {
        Some(db) => {
            db.migrate_booking_schema().await?;
            Arc::new(PgBookingRepository::new(db.pool))
        }
        None => {
            warn!("No database.url configured, bookings are kept in memory");
            Arc::new(InMemoryBookingRepository::new())
        }
    };

    let timeout = config.property_service.timeout();
    let properties = PropertyServiceClient::new(
        &config.property_service.url,
        timeout,
        config.internal.auth_key.as_deref(),
    )
    .context("Failed to build property service client")?;
    info!(url = %config.property_service.url, ?timeout, "Using property service");

    let service = BookingService::new(repo, Arc::new(properties), timeout);
    Ok(BookingAppState {
        service: Arc::new(service),
    })
}

pub fn gateway_state(config: &Config) -> anyhow::Result<GatewayState> {
    // The gateway only reaches the external procedures, so it never carries the internal key
    let properties = PropertyServiceClient::new(
        &config.property_service.url,
        config.property_service.timeout(),
        None,
    )?;
    let bookings = BookingServiceClient::new(
        &config.booking_service.url,
        config.booking_service.timeout(),
    )?;
    Ok(GatewayState {
        properties,
        bookings,
    })
}

pub async fn serve(app: Router, port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(err) => {
            error!(error = %err, "Unable to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
