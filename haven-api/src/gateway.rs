//! REST front door. Stateless: every route forwards to one RPC procedure.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use haven_shared::{
    Booking, BookingDetails, BookingId, NewBooking, Property, PropertyDetails, PropertyId,
};
use serde_json::{json, Value};

use crate::error::AppError;
use crate::state::GatewayState;

pub fn routes() -> Router<GatewayState> {
    Router::new()
        .route("/health", get(health))
        .route("/properties", get(list_properties).post(create_property))
        .route(
            "/properties/{id}",
            get(get_property).put(update_property).delete(delete_property),
        )
        .route("/bookings", get(list_bookings).post(create_booking))
        .route(
            "/bookings/{id}",
            get(get_booking).put(update_booking).delete(delete_booking),
        )
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn list_properties(State(state): State<GatewayState>) -> Result<Json<Vec<Property>>, AppError> {
    Ok(Json(state.properties.list_properties().await?))
}

async fn create_property(
    State(state): State<GatewayState>,
    Json(details): Json<PropertyDetails>,
) -> Result<Json<Property>, AppError> {
    Ok(Json(state.properties.create_property(&details).await?))
}

async fn get_property(
    State(state): State<GatewayState>,
    Path(id): Path<i64>,
) -> Result<Json<Property>, AppError> {
    Ok(Json(state.properties.get_property(PropertyId(id)).await?))
}

async fn update_property(
    State(state): State<GatewayState>,
    Path(id): Path<i64>,
    Json(details): Json<PropertyDetails>,
) -> Result<Json<Property>, AppError> {
    Ok(Json(state.properties.update_property(PropertyId(id), details).await?))
}

async fn delete_property(
    State(state): State<GatewayState>,
    Path(id): Path<i64>,
) -> Result<Json<Property>, AppError> {
    Ok(Json(state.properties.delete_property(PropertyId(id)).await?))
}

async fn list_bookings(State(state): State<GatewayState>) -> Result<Json<Vec<Booking>>, AppError> {
    Ok(Json(state.bookings.list_bookings().await?))
}

async fn create_booking(
    State(state): State<GatewayState>,
    Json(booking): Json<NewBooking>,
) -> Result<Json<Booking>, AppError> {
    Ok(Json(state.bookings.create_booking(&booking).await?))
}

async fn get_booking(
    State(state): State<GatewayState>,
    Path(id): Path<i64>,
) -> Result<Json<Booking>, AppError> {
    Ok(Json(state.bookings.get_booking(BookingId(id)).await?))
}

async fn update_booking(
    State(state): State<GatewayState>,
    Path(id): Path<i64>,
    Json(details): Json<BookingDetails>,
) -> Result<Json<Booking>, AppError> {
    Ok(Json(state.bookings.update_booking(BookingId(id), details).await?))
}

async fn delete_booking(
    State(state): State<GatewayState>,
    Path(id): Path<i64>,
) -> Result<Json<Booking>, AppError> {
    Ok(Json(state.bookings.delete_booking(BookingId(id)).await?))
}
