use haven_core::{BookingRepository, CoreError, CoreResult, PropertyClient, RemoteError};
use haven_shared::{Booking, BookingDetails, BookingId, BookingStatus, NewBooking};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// Owns booking rows and keeps them in step with the property service.
///
/// Creating a booking is a two-step saga: store it as PENDING, then ask the
/// property service to reserve the property. If the reservation fails the
/// booking is deleted again (the compensating action). Deleting a booking
/// mirrors this: the row goes first, then the property is released.
///
/// Neither direction retries, and three windows are left open:
///
/// * a confirm whose reply is lost or times out after the property service
///   already booked the property leaves that property BOOKED by a booking
///   that no longer exists;
/// * a confirm that succeeds remotely but cannot be recorded locally (the
///   booking was deleted meanwhile, or storage failed) leaves the property
///   BOOKED by a deleted or still PENDING booking;
/// * a delete whose cancel call fails leaves the booking gone and the
///   property still BOOKED.
///
/// Closing them needs idempotent confirm/cancel calls plus a reconciliation
/// sweep, which changes observable behavior and is not done here.
pub struct BookingService {
    repo: Arc<dyn BookingRepository>,
    properties: Arc<dyn PropertyClient>,
    call_timeout: Duration,
}

impl BookingService {
    pub fn new(
        repo: Arc<dyn BookingRepository>,
        properties: Arc<dyn PropertyClient>,
        call_timeout: Duration,
    ) -> Self {
        Self {
            repo,
            properties,
            call_timeout,
        }
    }

    /// Stores a booking and confirms it at the property service.
    ///
    /// Returns the CONFIRMED booking, or the confirmation failure after the
    /// booking has been deleted again.
    pub async fn create_booking(&self, new_booking: NewBooking) -> CoreResult<Booking> {
        new_booking.validate()?;

        let booking = self.repo.create(&new_booking, BookingStatus::Pending).await?;
        info!(booking_id = %booking.id, property_id = %booking.property_id, "Stored new booking");

        let reserved = self
            .call_property(self.properties.confirm_booking(booking.id, booking.property_id))
            .await;
        if let Err(err) = reserved {
            error!(booking_id = %booking.id, error = %err, "Error calling property service");
            return Err(self.undo_create(booking.id, err).await);
        }

        // The property stays booked if this fails
        let confirmed = self
            .repo
            .confirm(booking.id)
            .await
            .map_err(|err| {
                error!(booking_id = %booking.id, error = %err, "Unable to record confirmation");
                CoreError::from(err)
            })?
            .ok_or_else(|| {
                error!(booking_id = %booking.id, "Booking vanished before its confirmation was recorded");
                CoreError::booking_not_found(booking.id)
            })?;

        info!(booking_id = %confirmed.id, "Confirmed booking");
        Ok(confirmed)
    }

    /// Deletes a booking, then releases its property.
    pub async fn delete_booking(&self, id: BookingId) -> CoreResult<Booking> {
        let booking = self.get_booking(id).await?;

        if !self.repo.delete(id).await? {
            return Err(CoreError::booking_not_found(id));
        }
        info!(booking_id = %id, "Deleted booking");

        // No rollback of the delete if this fails
        self.call_property(self.properties.cancel_booking(booking.id, booking.property_id))
            .await
            .map_err(|err| {
                error!(booking_id = %id, property_id = %booking.property_id, error = %err,
                    "Error cancelling booking at property service");
                err
            })?;

        info!(booking_id = %id, property_id = %booking.property_id, "Cancelled booking at property service");
        Ok(booking)
    }

    pub async fn update_booking(&self, id: BookingId, details: BookingDetails) -> CoreResult<Booking> {
        details.validate()?;

        let booking = self
            .repo
            .update_details(id, &details)
            .await?
            .ok_or_else(|| CoreError::booking_not_found(id))?;

        info!(booking_id = %id, "Updated booking");
        Ok(booking)
    }

    pub async fn get_booking(&self, id: BookingId) -> CoreResult<Booking> {
        let booking = self
            .repo
            .get(id)
            .await?
            .ok_or_else(|| CoreError::booking_not_found(id))?;
        debug!(booking_id = %id, status = %booking.status, "Retrieved booking");
        Ok(booking)
    }

    pub async fn list_bookings(&self) -> CoreResult<Vec<Booking>> {
        let bookings = self.repo.find_all().await?;
        debug!(count = bookings.len(), "Retrieved bookings");
        Ok(bookings)
    }

    /// Compensation for a failed confirm. The booking was never confirmed, so
    /// there is nothing to cancel at the property service.
    async fn undo_create(&self, id: BookingId, original: CoreError) -> CoreError {
        info!(booking_id = %id, "Trying to delete booking to make state consistent");
        match self.repo.delete(id).await {
            Ok(_) => original,
            Err(err) => {
                error!(booking_id = %id, error = %err, "Compensating delete failed");
                CoreError::Compensation {
                    original: Box::new(original),
                    compensation: Box::new(err.into()),
                }
            }
        }
    }

    async fn call_property<F>(&self, call: F) -> CoreResult<()>
    where
        F: Future<Output = Result<(), RemoteError>>,
    {
        match tokio::time::timeout(self.call_timeout, call).await {
            Ok(result) => result.map_err(CoreError::from),
            Err(_) => Err(CoreError::Timeout(self.call_timeout)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use haven_core::{PropertyRepository, StoreError, StoreResult};
    use haven_property::{LocalPropertyClient, PropertyService};
    use haven_shared::{ErrorKind, Occupancy, PropertyDetails, PropertyId};
    use haven_store::{InMemoryBookingRepository, InMemoryPropertyRepository};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Harness {
        bookings: Arc<BookingService>,
        booking_repo: Arc<InMemoryBookingRepository>,
        properties: Arc<PropertyService>,
    }

    fn harness() -> Harness {
        let properties = Arc::new(PropertyService::new(Arc::new(
            InMemoryPropertyRepository::new(),
        )));
        let client = Arc::new(LocalPropertyClient::new(properties.clone()));
        harness_with_client(properties, client)
    }

    fn harness_with_client(
        properties: Arc<PropertyService>,
        client: Arc<dyn PropertyClient>,
    ) -> Harness {
        let booking_repo = Arc::new(InMemoryBookingRepository::new());
        let bookings = Arc::new(BookingService::new(
            booking_repo.clone(),
            client,
            Duration::from_millis(200),
        ));
        Harness {
            bookings,
            booking_repo,
            properties,
        }
    }

    fn property_details() -> PropertyDetails {
        PropertyDetails {
            name: "Loft".to_string(),
            description: "Top floor".to_string(),
            owner_name: "owner".to_string(),
            address: "3 High Street".to_string(),
        }
    }

    fn new_booking(property_id: PropertyId) -> NewBooking {
        NewBooking {
            customer_name: "cust".to_string(),
            comment: "two guests".to_string(),
            property_id,
        }
    }

    #[tokio::test]
    async fn test_create_booking_confirms_and_books_property() {
        let h = harness();
        let property = h.properties.create_property(property_details()).await.unwrap();

        let booking = h.bookings.create_booking(new_booking(property.id)).await.unwrap();

        assert_eq!(booking.status, BookingStatus::Confirmed);
        let stored = h.bookings.get_booking(booking.id).await.unwrap();
        assert_eq!(stored.status, BookingStatus::Confirmed);
        let property = h.properties.get_property(property.id).await.unwrap();
        assert_eq!(property.occupancy, Occupancy::Booked { booking_id: booking.id });
    }

    #[tokio::test]
    async fn test_create_against_booked_property_is_compensated() {
        let h = harness();
        let property = h.properties.create_property(property_details()).await.unwrap();
        let first = h.bookings.create_booking(new_booking(property.id)).await.unwrap();

        let err = h
            .bookings
            .create_booking(new_booking(property.id))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Conflict);
        let remaining = h.bookings.list_bookings().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, first.id);
        let property = h.properties.get_property(property.id).await.unwrap();
        assert_eq!(property.occupancy.holder(), Some(first.id));
    }

    #[tokio::test]
    async fn test_create_against_missing_property_is_compensated() {
        let h = harness();

        let err = h
            .bookings
            .create_booking(new_booking(PropertyId(404)))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(h.bookings.list_bookings().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_booking_never_reaches_storage() {
        let h = harness();
        let mut booking = new_booking(PropertyId(1));
        booking.customer_name = String::new();

        let err = h.bookings.create_booking(booking).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Invalid);
        assert!(h.booking_repo.find_all().await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_confirm_exactly_one() {
        let h = harness();
        let property = h.properties.create_property(property_details()).await.unwrap();

        let (a, b) = tokio::join!(
            h.bookings.create_booking(new_booking(property.id)),
            h.bookings.create_booking(new_booking(property.id)),
        );

        let (winner, loser) = match (a, b) {
            (Ok(winner), Err(loser)) | (Err(loser), Ok(winner)) => (winner, loser),
            other => panic!("expected exactly one confirmed booking, got {:?}", other),
        };
        assert_eq!(winner.status, BookingStatus::Confirmed);
        assert_eq!(loser.kind(), ErrorKind::Conflict);

        let remaining = h.bookings.list_bookings().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, winner.id);
        let property = h.properties.get_property(property.id).await.unwrap();
        assert_eq!(property.occupancy.holder(), Some(winner.id));
    }

    #[tokio::test]
    async fn test_delete_booking_frees_property() {
        let h = harness();
        let property = h.properties.create_property(property_details()).await.unwrap();
        let booking = h.bookings.create_booking(new_booking(property.id)).await.unwrap();

        let deleted = h.bookings.delete_booking(booking.id).await.unwrap();

        assert_eq!(deleted.id, booking.id);
        let err = h.bookings.get_booking(booking.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        let property = h.properties.get_property(property.id).await.unwrap();
        assert_eq!(property.occupancy, Occupancy::Free);
    }

    #[tokio::test]
    async fn test_delete_missing_booking_makes_no_property_call() {
        let properties = Arc::new(PropertyService::new(Arc::new(
            InMemoryPropertyRepository::new(),
        )));
        let client = Arc::new(ScriptedClient::default());
        let h = harness_with_client(properties, client.clone());

        let err = h.bookings.delete_booking(BookingId(8)).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_cancel_leaves_booking_deleted() {
        let h = harness();
        let property = h.properties.create_property(property_details()).await.unwrap();
        let booking = h.bookings.create_booking(new_booking(property.id)).await.unwrap();

        // Someone else releases the property first, so our cancel is refused
        h.properties
            .cancel_booking(booking.id, property.id)
            .await
            .unwrap();
        h.properties
            .confirm_booking(BookingId(500), property.id)
            .await
            .unwrap();

        let err = h.bookings.delete_booking(booking.id).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert!(h.booking_repo.get(booking.id).await.unwrap().is_none());
        let property = h.properties.get_property(property.id).await.unwrap();
        assert_eq!(property.occupancy.holder(), Some(BookingId(500)));
    }

    #[tokio::test]
    async fn test_update_booking_touches_customer_fields_only() {
        let h = harness();
        let property = h.properties.create_property(property_details()).await.unwrap();
        let booking = h.bookings.create_booking(new_booking(property.id)).await.unwrap();

        let updated = h
            .bookings
            .update_booking(
                booking.id,
                BookingDetails {
                    customer_name: "renamed".to_string(),
                    comment: "arriving early".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.customer_name, "renamed");
        assert_eq!(updated.comment, "arriving early");
        assert_eq!(updated.status, BookingStatus::Confirmed);
        assert_eq!(updated.property_id, property.id);
        let stored = h.bookings.get_booking(booking.id).await.unwrap();
        assert_eq!(stored.customer_name, "renamed");
        assert_eq!(stored.status, BookingStatus::Confirmed);
    }

    /// Property client with a scripted outcome that counts its calls.
    #[derive(Default)]
    struct ScriptedClient {
        calls: AtomicUsize,
        delay: Option<Duration>,
    }

    #[async_trait]
    impl PropertyClient for ScriptedClient {
        async fn confirm_booking(&self, _: BookingId, _: PropertyId) -> Result<(), RemoteError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            Err(RemoteError::internal("connection refused"))
        }

        async fn cancel_booking(&self, _: BookingId, _: PropertyId) -> Result<(), RemoteError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_transport_failure_is_compensated() {
        let properties = Arc::new(PropertyService::new(Arc::new(
            InMemoryPropertyRepository::new(),
        )));
        let client = Arc::new(ScriptedClient::default());
        let h = harness_with_client(properties, client.clone());

        let err = h
            .bookings
            .create_booking(new_booking(PropertyId(1)))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
        assert!(h.booking_repo.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_slow_property_service_times_out_and_is_compensated() {
        let properties = Arc::new(PropertyService::new(Arc::new(
            InMemoryPropertyRepository::new(),
        )));
        let client = Arc::new(ScriptedClient {
            calls: AtomicUsize::new(0),
            delay: Some(Duration::from_secs(5)),
        });
        let h = harness_with_client(properties, client);

        let err = h
            .bookings
            .create_booking(new_booking(PropertyId(1)))
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::Timeout(_)));
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(h.booking_repo.find_all().await.unwrap().is_empty());
    }

    /// Reserves the property for real, then reports the reply as lost.
    struct LostReplyClient {
        inner: LocalPropertyClient,
    }

    #[async_trait]
    impl PropertyClient for LostReplyClient {
        async fn confirm_booking(
            &self,
            booking_id: BookingId,
            property_id: PropertyId,
        ) -> Result<(), RemoteError> {
            self.inner.confirm_booking(booking_id, property_id).await?;
            Err(RemoteError::internal("request timed out"))
        }

        async fn cancel_booking(
            &self,
            booking_id: BookingId,
            property_id: PropertyId,
        ) -> Result<(), RemoteError> {
            self.inner.cancel_booking(booking_id, property_id).await
        }
    }

    #[tokio::test]
    async fn test_lost_confirm_reply_orphans_the_reservation() {
        let properties = Arc::new(PropertyService::new(Arc::new(
            InMemoryPropertyRepository::new(),
        )));
        let client = Arc::new(LostReplyClient {
            inner: LocalPropertyClient::new(properties.clone()),
        });
        let h = harness_with_client(properties.clone(), client);
        let property = properties.create_property(property_details()).await.unwrap();

        let err = h
            .bookings
            .create_booking(new_booking(property.id))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);

        // Known gap: the booking is gone but the property stays booked by it
        assert!(h.booking_repo.find_all().await.unwrap().is_empty());
        let property = properties.get_property(property.id).await.unwrap();
        assert_eq!(property.occupancy.holder(), Some(BookingId(1)));
    }

    /// Booking storage whose deletes always fail.
    struct UndeletableBookings {
        inner: InMemoryBookingRepository,
    }

    #[async_trait]
    impl BookingRepository for UndeletableBookings {
        async fn create(&self, booking: &NewBooking, status: BookingStatus) -> StoreResult<Booking> {
            self.inner.create(booking, status).await
        }

        async fn get(&self, id: BookingId) -> StoreResult<Option<Booking>> {
            self.inner.get(id).await
        }

        async fn find_all(&self) -> StoreResult<Vec<Booking>> {
            self.inner.find_all().await
        }

        async fn update_details(
            &self,
            id: BookingId,
            details: &BookingDetails,
        ) -> StoreResult<Option<Booking>> {
            self.inner.update_details(id, details).await
        }

        async fn confirm(&self, id: BookingId) -> StoreResult<Option<Booking>> {
            self.inner.confirm(id).await
        }

        async fn delete(&self, _: BookingId) -> StoreResult<bool> {
            Err(StoreError::Backend("disk full".to_string()))
        }
    }

    #[tokio::test]
    async fn test_failed_compensation_reports_both_errors() {
        let property_repo = Arc::new(InMemoryPropertyRepository::new());
        let properties = Arc::new(PropertyService::new(property_repo.clone()));
        let property = properties.create_property(property_details()).await.unwrap();
        let mut held = property.clone();
        held.book(BookingId(99)).unwrap();
        property_repo
            .save_transition(&held, Occupancy::Free)
            .await
            .unwrap();

        let repo = Arc::new(UndeletableBookings {
            inner: InMemoryBookingRepository::new(),
        });
        let bookings = BookingService::new(
            repo.clone(),
            Arc::new(LocalPropertyClient::new(properties)),
            DEFAULT_CALL_TIMEOUT,
        );

        let err = bookings
            .create_booking(new_booking(property.id))
            .await
            .unwrap_err();

        match &err {
            CoreError::Compensation {
                original,
                compensation,
            } => {
                assert_eq!(original.kind(), ErrorKind::Conflict);
                assert!(matches!(**compensation, CoreError::Storage(_)));
            }
            other => panic!("expected a compensation error, got {:?}", other),
        }
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert!(err.to_string().contains("disk full"));

        // The pending row is stranded, never confirmed
        let stranded = repo.find_all().await.unwrap();
        assert_eq!(stranded.len(), 1);
        assert_eq!(stranded[0].status, BookingStatus::Pending);
    }

    /// Booking storage that cannot record confirmations.
    struct UnconfirmableBookings {
        inner: InMemoryBookingRepository,
    }

    #[async_trait]
    impl BookingRepository for UnconfirmableBookings {
        async fn create(&self, booking: &NewBooking, status: BookingStatus) -> StoreResult<Booking> {
            self.inner.create(booking, status).await
        }

        async fn get(&self, id: BookingId) -> StoreResult<Option<Booking>> {
            self.inner.get(id).await
        }

        async fn find_all(&self) -> StoreResult<Vec<Booking>> {
            self.inner.find_all().await
        }

        async fn update_details(
            &self,
            id: BookingId,
            details: &BookingDetails,
        ) -> StoreResult<Option<Booking>> {
            self.inner.update_details(id, details).await
        }

        async fn confirm(&self, _: BookingId) -> StoreResult<Option<Booking>> {
            Err(StoreError::Backend("connection reset".to_string()))
        }

        async fn delete(&self, id: BookingId) -> StoreResult<bool> {
            self.inner.delete(id).await
        }
    }

    #[tokio::test]
    async fn test_unrecorded_confirmation_leaves_property_booked() {
        let properties = Arc::new(PropertyService::new(Arc::new(
            InMemoryPropertyRepository::new(),
        )));
        let property = properties.create_property(property_details()).await.unwrap();
        let repo = Arc::new(UnconfirmableBookings {
            inner: InMemoryBookingRepository::new(),
        });
        let bookings = BookingService::new(
            repo.clone(),
            Arc::new(LocalPropertyClient::new(properties.clone())),
            DEFAULT_CALL_TIMEOUT,
        );

        let err = bookings
            .create_booking(new_booking(property.id))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);

        // Known gap: no compensation runs once the property has been booked
        let stranded = repo.find_all().await.unwrap();
        assert_eq!(stranded.len(), 1);
        assert_eq!(stranded[0].status, BookingStatus::Pending);
        let property = properties.get_property(property.id).await.unwrap();
        assert_eq!(property.occupancy.holder(), Some(stranded[0].id));
    }

    /// Delays every confirm before forwarding it to the real property service.
    struct SlowConfirmClient {
        inner: LocalPropertyClient,
        delay: Duration,
    }

    #[async_trait]
    impl PropertyClient for SlowConfirmClient {
        async fn confirm_booking(
            &self,
            booking_id: BookingId,
            property_id: PropertyId,
        ) -> Result<(), RemoteError> {
            tokio::time::sleep(self.delay).await;
            self.inner.confirm_booking(booking_id, property_id).await
        }

        async fn cancel_booking(
            &self,
            booking_id: BookingId,
            property_id: PropertyId,
        ) -> Result<(), RemoteError> {
            self.inner.cancel_booking(booking_id, property_id).await
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_update_while_pending_survives_confirmation() {
        let properties = Arc::new(PropertyService::new(Arc::new(
            InMemoryPropertyRepository::new(),
        )));
        let property = properties.create_property(property_details()).await.unwrap();
        let client = Arc::new(SlowConfirmClient {
            inner: LocalPropertyClient::new(properties.clone()),
            delay: Duration::from_millis(100),
        });
        let booking_repo = Arc::new(InMemoryBookingRepository::new());
        let bookings = Arc::new(BookingService::new(
            booking_repo.clone(),
            client,
            DEFAULT_CALL_TIMEOUT,
        ));

        let create = tokio::spawn({
            let bookings = bookings.clone();
            async move { bookings.create_booking(new_booking(property.id)).await }
        });

        // Rename the booking while the confirm call is still in flight
        let pending = loop {
            if let Some(b) = booking_repo.find_all().await.unwrap().into_iter().next() {
                break b;
            }
            tokio::task::yield_now().await;
        };
        let renamed = bookings
            .update_booking(
                pending.id,
                BookingDetails {
                    customer_name: "renamed".to_string(),
                    comment: "arriving early".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.status, BookingStatus::Pending);

        let confirmed = create.await.unwrap().unwrap();
        assert_eq!(confirmed.status, BookingStatus::Confirmed);
        assert_eq!(confirmed.customer_name, "renamed");

        // A later update keeps the confirmed status
        bookings
            .update_booking(
                pending.id,
                BookingDetails {
                    customer_name: "renamed again".to_string(),
                    comment: String::new(),
                },
            )
            .await
            .unwrap();

        let stored = bookings.get_booking(pending.id).await.unwrap();
        assert_eq!(stored.status, BookingStatus::Confirmed);
        assert_eq!(stored.customer_name, "renamed again");
        let property = properties.get_property(property.id).await.unwrap();
        assert_eq!(property.occupancy.holder(), Some(pending.id));
    }
}
