use async_trait::async_trait;
use chrono::{DateTime, Utc};
use haven_core::{BookingRepository, StoreError, StoreResult};
use haven_shared::{Booking, BookingDetails, BookingId, BookingStatus, NewBooking, PropertyId};
use sqlx::PgPool;

use crate::database::backend;

const COLUMNS: &str = "id, customer_name, comment, property_id, status, created_at, updated_at";

pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: i64,
    customer_name: String,
    comment: String,
    property_id: i64,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = StoreError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let status: BookingStatus = row
            .status
            .parse::<BookingStatus>()
            .map_err(|e| StoreError::Corrupt(format!("booking {}: {}", row.id, e)))?;

        Ok(Booking {
            id: BookingId(row.id),
            customer_name: row.customer_name,
            comment: row.comment,
            property_id: PropertyId(row.property_id),
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn create(&self, booking: &NewBooking, status: BookingStatus) -> StoreResult<Booking> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            r#"
            INSERT INTO bookings (customer_name, comment, property_id, status)
            VALUES ($1, $2, $3, $4)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&booking.customer_name)
        .bind(&booking.comment)
        .bind(booking.property_id.0)
        .bind(status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(backend)?;

        row.try_into()
    }

    async fn get(&self, id: BookingId) -> StoreResult<Option<Booking>> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {COLUMNS} FROM bookings WHERE id = $1"
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        row.map(Booking::try_from).transpose()
    }

    async fn find_all(&self) -> StoreResult<Vec<Booking>> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {COLUMNS} FROM bookings ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        rows.into_iter().map(Booking::try_from).collect()
    }

    async fn update_details(
        &self,
        id: BookingId,
        details: &BookingDetails,
    ) -> StoreResult<Option<Booking>> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            r#"
            UPDATE bookings
            SET customer_name = $2, comment = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id.0)
        .bind(&details.customer_name)
        .bind(&details.comment)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        row.map(Booking::try_from).transpose()
    }

    async fn confirm(&self, id: BookingId) -> StoreResult<Option<Booking>> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            r#"
            UPDATE bookings
            SET status = 'CONFIRMED', updated_at = NOW()
            WHERE id = $1 AND status = 'PENDING'
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        row.map(Booking::try_from).transpose()
    }

    async fn delete(&self, id: BookingId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(backend)?;

        Ok(result.rows_affected() == 1)
    }
}
