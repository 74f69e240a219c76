use axum::{http::Method, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod booking;
pub mod bootstrap;
pub mod error;
pub mod gateway;
pub mod middleware;
pub mod property;
pub mod state;
pub mod telemetry;

pub use error::AppError;
pub use state::{BookingAppState, GatewayState, PropertyAppState};

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ])
}

/// RPC surface of the property service, internal procedures included.
pub fn property_app(state: PropertyAppState) -> Router {
    property::routes(state.clone())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// RPC surface of the booking service.
pub fn booking_app(state: BookingAppState) -> Router {
    booking::routes()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Public REST gateway in front of both services.
pub fn gateway_app(state: GatewayState) -> Router {
    gateway::routes()
        .layer(cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
