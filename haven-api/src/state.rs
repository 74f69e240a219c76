use haven_booking::BookingService;
use haven_property::PropertyService;
use haven_store::{BookingServiceClient, PropertyServiceClient};
use std::sync::Arc;

#[derive(Clone)]
pub struct PropertyAppState {
    pub service: Arc<PropertyService>,
    /// Required on property-internal calls when set.
    pub internal_key: Option<Arc<str>>,
}

impl PropertyAppState {
    pub fn new(service: Arc<PropertyService>, internal_key: Option<String>) -> Self {
        Self {
            service,
            internal_key: internal_key.map(Arc::from),
        }
    }
}

#[derive(Clone)]
pub struct BookingAppState {
    pub service: Arc<BookingService>,
}

#[derive(Clone)]
pub struct GatewayState {
    pub properties: PropertyServiceClient,
    pub bookings: BookingServiceClient,
}
