use axum::{extract::State, routing::post, Json, Router};
use haven_shared::rpc::{
    paths, BookingIdRequest, Empty, ListBookingsResponse, UpdateBookingRequest,
};
use haven_shared::{Booking, NewBooking};

use crate::error::AppError;
use crate::state::BookingAppState;

pub fn routes() -> Router<BookingAppState> {
    Router::new()
        .route(paths::CREATE_BOOKING, post(create_booking))
        .route(paths::UPDATE_BOOKING, post(update_booking))
        .route(paths::GET_BOOKING, post(get_booking))
        .route(paths::LIST_BOOKINGS, post(list_bookings))
        .route(paths::DELETE_BOOKING, post(delete_booking))
}

async fn create_booking(
    State(state): State<BookingAppState>,
    Json(req): Json<NewBooking>,
) -> Result<Json<Booking>, AppError> {
    Ok(Json(state.service.create_booking(req).await?))
}

async fn update_booking(
    State(state): State<BookingAppState>,
    Json(req): Json<UpdateBookingRequest>,
) -> Result<Json<Booking>, AppError> {
    Ok(Json(state.service.update_booking(req.id, req.details).await?))
}

async fn get_booking(
    State(state): State<BookingAppState>,
    Json(req): Json<BookingIdRequest>,
) -> Result<Json<Booking>, AppError> {
    Ok(Json(state.service.get_booking(req.id).await?))
}

async fn list_bookings(
    State(state): State<BookingAppState>,
    Json(_): Json<Empty>,
) -> Result<Json<ListBookingsResponse>, AppError> {
    let bookings = state.service.list_bookings().await?;
    Ok(Json(ListBookingsResponse { bookings }))
}

async fn delete_booking(
    State(state): State<BookingAppState>,
    Json(req): Json<BookingIdRequest>,
) -> Result<Json<Booking>, AppError> {
    Ok(Json(state.service.delete_booking(req.id).await?))
}
