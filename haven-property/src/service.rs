use haven_core::{CoreError, CoreResult, PropertyRepository};
use haven_shared::{BookingId, Occupancy, Property, PropertyDetails, PropertyId};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Owns property rows and enforces their reservation invariants.
///
/// `confirm_booking` and `cancel_booking` form the internal surface called by
/// the booking service; everything else is plain CRUD.
pub struct PropertyService {
    repo: Arc<dyn PropertyRepository>,
}

impl PropertyService {
    pub fn new(repo: Arc<dyn PropertyRepository>) -> Self {
        Self { repo }
    }

    pub async fn create_property(&self, details: PropertyDetails) -> CoreResult<Property> {
        details.validate()?;
        let property = self.repo.create(&details).await?;
        info!(property_id = %property.id, "Stored new property");
        Ok(property)
    }

    pub async fn update_property(
        &self,
        id: PropertyId,
        details: PropertyDetails,
    ) -> CoreResult<Property> {
        details.validate()?;
        let property = self
            .repo
            .update_details(id, &details)
            .await?
            .ok_or_else(|| CoreError::property_not_found(id))?;
        info!(property_id = %id, "Updated property");
        Ok(property)
    }

    pub async fn get_property(&self, id: PropertyId) -> CoreResult<Property> {
        let property = self
            .repo
            .get(id)
            .await?
            .ok_or_else(|| CoreError::property_not_found(id))?;
        debug!(property_id = %id, status = %property.status(), "Retrieved property");
        Ok(property)
    }

    pub async fn list_properties(&self) -> CoreResult<Vec<Property>> {
        let properties = self.repo.find_all().await?;
        debug!(count = properties.len(), "Retrieved properties");
        Ok(properties)
    }

    /// Deletes a free property. A booked one must be released first.
    pub async fn delete_property(&self, id: PropertyId) -> CoreResult<Property> {
        let property = self.get_property(id).await?;
        property.ensure_deletable()?;

        if !self.repo.delete_unbooked(id).await? {
            // Booked or removed between the read and the delete
            let current = self
                .repo
                .get(id)
                .await?
                .ok_or_else(|| CoreError::property_not_found(id))?;
            current.ensure_deletable()?;
            return Err(CoreError::Conflict(format!("property {}", id)));
        }

        info!(property_id = %id, "Deleted property");
        Ok(property)
    }

    /// FREE -> BOOKED for `booking_id`. Rejects a property that is already booked.
    pub async fn confirm_booking(
        &self,
        booking_id: BookingId,
        property_id: PropertyId,
    ) -> CoreResult<Property> {
        info!(%booking_id, %property_id, "Received booking confirmation");

        let mut property = self.get_property(property_id).await?;
        let expected = property.occupancy;
        if let Err(err) = property.book(booking_id) {
            warn!(%booking_id, %property_id, error = %err, "Rejected booking confirmation");
            return Err(err.into());
        }
        self.persist_transition(&property, expected).await?;

        info!(%booking_id, %property_id, "Booked property");
        Ok(property)
    }

    /// BOOKED -> FREE. Only the reservation holder may release the property.
    pub async fn cancel_booking(
        &self,
        booking_id: BookingId,
        property_id: PropertyId,
    ) -> CoreResult<Property> {
        info!(%booking_id, %property_id, "Received booking cancellation");

        let mut property = self.get_property(property_id).await?;
        let expected = property.occupancy;
        if let Err(err) = property.release(booking_id) {
            warn!(%booking_id, %property_id, error = %err, "Rejected booking cancellation");
            return Err(err.into());
        }
        self.persist_transition(&property, expected).await?;

        info!(%booking_id, %property_id, "Freed property");
        Ok(property)
    }

    async fn persist_transition(&self, property: &Property, expected: Occupancy) -> CoreResult<()> {
        if self.repo.save_transition(property, expected).await? {
            return Ok(());
        }
        warn!(property_id = %property.id, "Lost a concurrent transition");
        Err(CoreError::Conflict(format!("property {}", property.id)))
    }
}
