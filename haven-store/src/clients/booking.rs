use haven_core::RemoteError;
use haven_shared::rpc::{
    paths, BookingIdRequest, Empty, ListBookingsResponse, UpdateBookingRequest,
};
use haven_shared::{Booking, BookingDetails, BookingId, NewBooking};
use std::time::Duration;

use super::{base_url, build_client, call, ClientError};

/// Client for the booking service's external surface.
#[derive(Clone)]
pub struct BookingServiceClient {
    url: String,
    client: reqwest::Client,
}

impl BookingServiceClient {
    /// `timeout` must leave room for the booking service's own call to the property service.
    pub fn new(url: &str, timeout: Duration) -> Result<Self, ClientError> {
        Ok(Self {
            url: base_url(url),
            client: build_client(timeout, None)?,
        })
    }

    #[tracing::instrument(skip(self))]
    pub async fn create_booking(&self, booking: &NewBooking) -> Result<Booking, RemoteError> {
        call(&self.client, &self.url, paths::CREATE_BOOKING, booking).await
    }

    #[tracing::instrument(skip(self, details))]
    pub async fn update_booking(
        &self,
        id: BookingId,
        details: BookingDetails,
    ) -> Result<Booking, RemoteError> {
        let req = UpdateBookingRequest { id, details };
        call(&self.client, &self.url, paths::UPDATE_BOOKING, &req).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_booking(&self, id: BookingId) -> Result<Booking, RemoteError> {
        call(&self.client, &self.url, paths::GET_BOOKING, &BookingIdRequest { id }).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_bookings(&self) -> Result<Vec<Booking>, RemoteError> {
        let resp: ListBookingsResponse =
            call(&self.client, &self.url, paths::LIST_BOOKINGS, &Empty {}).await?;
        Ok(resp.bookings)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_booking(&self, id: BookingId) -> Result<Booking, RemoteError> {
        call(&self.client, &self.url, paths::DELETE_BOOKING, &BookingIdRequest { id }).await
    }
}
