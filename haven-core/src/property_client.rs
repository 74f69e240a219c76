use async_trait::async_trait;
use haven_shared::{BookingId, ErrorKind, PropertyId};

/// Failure reported by (or while reaching) a remote service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct RemoteError {
    pub kind: ErrorKind,
    pub message: String,
}

impl RemoteError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

/// The property service's internal surface, as seen by the booking service.
#[async_trait]
pub trait PropertyClient: Send + Sync {
    /// Reserve `property_id` for `booking_id` (FREE -> BOOKED).
    async fn confirm_booking(
        &self,
        booking_id: BookingId,
        property_id: PropertyId,
    ) -> Result<(), RemoteError>;

    /// Release `property_id` held by `booking_id` (BOOKED -> FREE).
    async fn cancel_booking(
        &self,
        booking_id: BookingId,
        property_id: PropertyId,
    ) -> Result<(), RemoteError>;
}
