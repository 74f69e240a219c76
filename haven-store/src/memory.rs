//! In-memory repositories, used when no database URL is configured and in tests.
//!
//! Every operation runs under one table lock, which gives the same single-row
//! atomicity the Postgres repositories get from their statements.

use async_trait::async_trait;
use haven_core::{BookingRepository, PropertyRepository, StoreResult};
use haven_shared::{
    Booking, BookingDetails, BookingId, BookingStatus, NewBooking, Occupancy, Property,
    PropertyDetails, PropertyId,
};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

struct Table<T> {
    next_id: i64,
    rows: BTreeMap<i64, T>,
}

impl<T> Table<T> {
    fn new() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }

    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

pub struct InMemoryPropertyRepository {
    table: RwLock<Table<Property>>,
}

impl InMemoryPropertyRepository {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table::new()),
        }
    }
}

impl Default for InMemoryPropertyRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PropertyRepository for InMemoryPropertyRepository {
    async fn create(&self, details: &PropertyDetails) -> StoreResult<Property> {
        let mut table = self.table.write().await;
        let id = table.allocate_id();
        let property = Property::new(PropertyId(id), details.clone());
        table.rows.insert(id, property.clone());
        Ok(property)
    }

    async fn get(&self, id: PropertyId) -> StoreResult<Option<Property>> {
        Ok(self.table.read().await.rows.get(&id.0).cloned())
    }

    async fn find_all(&self) -> StoreResult<Vec<Property>> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn update_details(
        &self,
        id: PropertyId,
        details: &PropertyDetails,
    ) -> StoreResult<Option<Property>> {
        let mut table = self.table.write().await;
        Ok(table.rows.get_mut(&id.0).map(|stored| {
            stored.apply_details(details.clone());
            stored.clone()
        }))
    }

    async fn save_transition(
        &self,
        property: &Property,
        expected: Occupancy,
    ) -> StoreResult<bool> {
        let mut table = self.table.write().await;
        match table.rows.get_mut(&property.id.0) {
            Some(stored) if stored.occupancy == expected => {
                stored.occupancy = property.occupancy;
                stored.updated_at = property.updated_at;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_unbooked(&self, id: PropertyId) -> StoreResult<bool> {
        let mut table = self.table.write().await;
        let free = matches!(
            table.rows.get(&id.0),
            Some(stored) if stored.occupancy == Occupancy::Free
        );
        if free {
            table.rows.remove(&id.0);
        }
        Ok(free)
    }
}

pub struct InMemoryBookingRepository {
    table: RwLock<Table<Booking>>,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table::new()),
        }
    }
}

impl Default for InMemoryBookingRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn create(&self, booking: &NewBooking, status: BookingStatus) -> StoreResult<Booking> {
        let mut table = self.table.write().await;
        let id = table.allocate_id();
        let mut stored = Booking::new(BookingId(id), booking.clone());
        stored.status = status;
        table.rows.insert(id, stored.clone());
        Ok(stored)
    }

    async fn get(&self, id: BookingId) -> StoreResult<Option<Booking>> {
        Ok(self.table.read().await.rows.get(&id.0).cloned())
    }

    async fn find_all(&self) -> StoreResult<Vec<Booking>> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn update_details(
        &self,
        id: BookingId,
        details: &BookingDetails,
    ) -> StoreResult<Option<Booking>> {
        let mut table = self.table.write().await;
        Ok(table.rows.get_mut(&id.0).map(|stored| {
            stored.apply_details(details.clone());
            stored.clone()
        }))
    }

    async fn confirm(&self, id: BookingId) -> StoreResult<Option<Booking>> {
        let mut table = self.table.write().await;
        let Some(stored) = table.rows.get_mut(&id.0) else {
            return Ok(None);
        };
        if stored.confirm().is_err() {
            return Ok(None);
        }
        Ok(Some(stored.clone()))
    }

    async fn delete(&self, id: BookingId) -> StoreResult<bool> {
        Ok(self.table.write().await.rows.remove(&id.0).is_some())
    }
}
