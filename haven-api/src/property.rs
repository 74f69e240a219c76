use axum::{extract::State, middleware, routing::post, Json, Router};
use haven_shared::rpc::{
    paths, BookingRequest, Empty, ListPropertiesResponse, PropertyIdRequest,
    UpdatePropertyRequest,
};
use haven_shared::{Property, PropertyDetails};

use crate::error::AppError;
use crate::middleware::require_internal_key;
use crate::state::PropertyAppState;

pub fn routes(state: PropertyAppState) -> Router<PropertyAppState> {
    let internal = Router::new()
        .route(paths::CONFIRM_BOOKING, post(confirm_booking))
        .route(paths::CANCEL_BOOKING, post(cancel_booking))
        .route_layer(middleware::from_fn_with_state(state, require_internal_key));

    Router::new()
        .route(paths::CREATE_PROPERTY, post(create_property))
        .route(paths::UPDATE_PROPERTY, post(update_property))
        .route(paths::GET_PROPERTY, post(get_property))
        .route(paths::LIST_PROPERTIES, post(list_properties))
        .route(paths::DELETE_PROPERTY, post(delete_property))
        .merge(internal)
}

async fn create_property(
    State(state): State<PropertyAppState>,
    Json(details): Json<PropertyDetails>,
) -> Result<Json<Property>, AppError> {
    Ok(Json(state.service.create_property(details).await?))
}

async fn update_property(
    State(state): State<PropertyAppState>,
    Json(req): Json<UpdatePropertyRequest>,
) -> Result<Json<Property>, AppError> {
    Ok(Json(state.service.update_property(req.id, req.details).await?))
}

async fn get_property(
    State(state): State<PropertyAppState>,
    Json(req): Json<PropertyIdRequest>,
) -> Result<Json<Property>, AppError> {
    Ok(Json(state.service.get_property(req.id).await?))
}

async fn list_properties(
    State(state): State<PropertyAppState>,
    Json(_): Json<Empty>,
) -> Result<Json<ListPropertiesResponse>, AppError> {
    let properties = state.service.list_properties().await?;
    Ok(Json(ListPropertiesResponse { properties }))
}

async fn delete_property(
    State(state): State<PropertyAppState>,
    Json(req): Json<PropertyIdRequest>,
) -> Result<Json<Property>, AppError> {
    Ok(Json(state.service.delete_property(req.id).await?))
}

async fn confirm_booking(
    State(state): State<PropertyAppState>,
    Json(req): Json<BookingRequest>,
) -> Result<Json<Empty>, AppError> {
    state
        .service
        .confirm_booking(req.booking_id, req.property_id)
        .await?;
    Ok(Json(Empty {}))
}

async fn cancel_booking(
    State(state): State<PropertyAppState>,
    Json(req): Json<BookingRequest>,
) -> Result<Json<Empty>, AppError> {
    state
        .service
        .cancel_booking(req.booking_id, req.property_id)
        .await?;
    Ok(Json(Empty {}))
}
