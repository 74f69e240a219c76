use async_trait::async_trait;
use haven_shared::{
    Booking, BookingDetails, BookingId, BookingStatus, NewBooking, Occupancy, Property,
    PropertyDetails, PropertyId,
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage backend failure: {0}")]
    Backend(String),

    #[error("stored row is inconsistent: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage for property rows. Each call is a single-row atomic operation.
#[async_trait]
pub trait PropertyRepository: Send + Sync {
    /// Inserts a new free property and returns it with its assigned id.
    async fn create(&self, details: &PropertyDetails) -> StoreResult<Property>;

    async fn get(&self, id: PropertyId) -> StoreResult<Option<Property>>;

    async fn find_all(&self) -> StoreResult<Vec<Property>>;

    /// Overwrites the user-settable fields only; status and holder are untouched.
    async fn update_details(
        &self,
        id: PropertyId,
        details: &PropertyDetails,
    ) -> StoreResult<Option<Property>>;

    /// Writes the occupancy of `property` if the stored row still has `expected`.
    ///
    /// Returns `false` when the row changed (or vanished) since it was read.
    async fn save_transition(&self, property: &Property, expected: Occupancy)
        -> StoreResult<bool>;

    /// Removes the row if it is currently free. Returns `false` otherwise.
    async fn delete_unbooked(&self, id: PropertyId) -> StoreResult<bool>;
}

/// Storage for booking rows.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create(&self, booking: &NewBooking, status: BookingStatus) -> StoreResult<Booking>;

    async fn get(&self, id: BookingId) -> StoreResult<Option<Booking>>;

    async fn find_all(&self) -> StoreResult<Vec<Booking>>;

    /// Overwrites customer name and comment only; status is untouched.
    async fn update_details(
        &self,
        id: BookingId,
        details: &BookingDetails,
    ) -> StoreResult<Option<Booking>>;

    /// PENDING -> CONFIRMED without touching the detail columns.
    ///
    /// Returns the confirmed row, or `None` if there is no pending row with that id.
    async fn confirm(&self, id: BookingId) -> StoreResult<Option<Booking>>;

    /// Returns `false` if there was no such row.
    async fn delete(&self, id: BookingId) -> StoreResult<bool>;
}
