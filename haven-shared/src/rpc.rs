//! Request and response bodies of the JSON-over-HTTP RPC surfaces.

use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;
use crate::models::{Booking, BookingDetails, BookingId, Property, PropertyDetails, PropertyId};

/// Header carrying the shared key that guards the property-internal procedures.
pub const INTERNAL_KEY_HEADER: &str = "x-haven-internal-key";

pub mod paths {
    pub const CREATE_PROPERTY: &str = "/rpc/property/create";
    pub const UPDATE_PROPERTY: &str = "/rpc/property/update";
    pub const GET_PROPERTY: &str = "/rpc/property/get";
    pub const LIST_PROPERTIES: &str = "/rpc/property/list";
    pub const DELETE_PROPERTY: &str = "/rpc/property/delete";

    pub const CONFIRM_BOOKING: &str = "/rpc/property-internal/confirm-booking";
    pub const CANCEL_BOOKING: &str = "/rpc/property-internal/cancel-booking";

    pub const CREATE_BOOKING: &str = "/rpc/booking/create";
    pub const UPDATE_BOOKING: &str = "/rpc/booking/update";
    pub const GET_BOOKING: &str = "/rpc/booking/get";
    pub const LIST_BOOKINGS: &str = "/rpc/booking/list";
    pub const DELETE_BOOKING: &str = "/rpc/booking/delete";
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empty {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyIdRequest {
    pub id: PropertyId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePropertyRequest {
    pub id: PropertyId,
    #[serde(flatten)]
    pub details: PropertyDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListPropertiesResponse {
    pub properties: Vec<Property>,
}

/// Argument of the property-internal `ConfirmBooking` / `CancelBooking` calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub booking_id: BookingId,
    pub property_id: PropertyId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingIdRequest {
    pub id: BookingId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateBookingRequest {
    pub id: BookingId,
    #[serde(flatten)]
    pub details: BookingDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListBookingsResponse {
    pub bookings: Vec<Booking>,
}

/// Body of every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub error: String,
}
