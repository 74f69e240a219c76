use async_trait::async_trait;
use haven_core::{PropertyClient, RemoteError};
use haven_shared::{BookingId, PropertyId};
use std::sync::Arc;

use crate::PropertyService;

/// Calls a property service living in the same process, without a network hop.
///
/// Errors cross the boundary the same way they would over RPC: only the kind
/// and the message survive.
#[derive(Clone)]
pub struct LocalPropertyClient {
    service: Arc<PropertyService>,
}

impl LocalPropertyClient {
    pub fn new(service: Arc<PropertyService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl PropertyClient for LocalPropertyClient {
    async fn confirm_booking(
        &self,
        booking_id: BookingId,
        property_id: PropertyId,
    ) -> Result<(), RemoteError> {
        self.service
            .confirm_booking(booking_id, property_id)
            .await
            .map(|_| ())
            .map_err(RemoteError::from)
    }

    async fn cancel_booking(
        &self,
        booking_id: BookingId,
        property_id: PropertyId,
    ) -> Result<(), RemoteError> {
        self.service
            .cancel_booking(booking_id, property_id)
            .await
            .map(|_| ())
            .map_err(RemoteError::from)
    }
}
