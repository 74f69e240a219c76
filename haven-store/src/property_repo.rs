use async_trait::async_trait;
use chrono::{DateTime, Utc};
use haven_core::{PropertyRepository, StoreError, StoreResult};
use haven_shared::{BookingId, Occupancy, Property, PropertyDetails, PropertyId, PropertyStatus};
use sqlx::PgPool;

use crate::database::backend;

const COLUMNS: &str =
    "id, name, description, owner_name, address, status, booking_id, created_at, updated_at";

pub struct PgPropertyRepository {
    pool: PgPool,
}

impl PgPropertyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PropertyRow {
    id: i64,
    name: String,
    description: String,
    owner_name: String,
    address: String,
    status: String,
    booking_id: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PropertyRow> for Property {
    type Error = StoreError;

    fn try_from(row: PropertyRow) -> Result<Self, Self::Error> {
        let status: PropertyStatus = row
            .status
            .parse::<PropertyStatus>()
            .map_err(|e| StoreError::Corrupt(format!("property {}: {}", row.id, e)))?;
        let occupancy = Occupancy::from_parts(status, row.booking_id.map(BookingId))
            .ok_or_else(|| {
                StoreError::Corrupt(format!(
                    "property {} has status {} with holder {:?}",
                    row.id, status, row.booking_id
                ))
            })?;

        Ok(Property {
            id: PropertyId(row.id),
            name: row.name,
            description: row.description,
            owner_name: row.owner_name,
            address: row.address,
            occupancy,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl PropertyRepository for PgPropertyRepository {
    async fn create(&self, details: &PropertyDetails) -> StoreResult<Property> {
        let row = sqlx::query_as::<_, PropertyRow>(&format!(
            r#"
            INSERT INTO properties (name, description, owner_name, address, status)
            VALUES ($1, $2, $3, $4, 'FREE')
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&details.name)
        .bind(&details.description)
        .bind(&details.owner_name)
        .bind(&details.address)
        .fetch_one(&self.pool)
        .await
        .map_err(backend)?;

        row.try_into()
    }

    async fn get(&self, id: PropertyId) -> StoreResult<Option<Property>> {
        let row = sqlx::query_as::<_, PropertyRow>(&format!(
            "SELECT {COLUMNS} FROM properties WHERE id = $1"
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        row.map(Property::try_from).transpose()
    }

    async fn find_all(&self) -> StoreResult<Vec<Property>> {
        let rows = sqlx::query_as::<_, PropertyRow>(&format!(
            "SELECT {COLUMNS} FROM properties ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        rows.into_iter().map(Property::try_from).collect()
    }

    async fn update_details(
        &self,
        id: PropertyId,
        details: &PropertyDetails,
    ) -> StoreResult<Option<Property>> {
        let row = sqlx::query_as::<_, PropertyRow>(&format!(
            r#"
            UPDATE properties
            SET name = $2, description = $3, owner_name = $4, address = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id.0)
        .bind(&details.name)
        .bind(&details.description)
        .bind(&details.owner_name)
        .bind(&details.address)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        row.map(Property::try_from).transpose()
    }

    async fn save_transition(
        &self,
        property: &Property,
        expected: Occupancy,
    ) -> StoreResult<bool> {
        // Check and write in one statement so the row-level lock serializes racing transitions
        let result = sqlx::query(
            r#"
            UPDATE properties
            SET status = $2, booking_id = $3, updated_at = $4
            WHERE id = $1 AND status = $5 AND booking_id IS NOT DISTINCT FROM $6
            "#,
        )
        .bind(property.id.0)
        .bind(property.occupancy.status().as_str())
        .bind(property.occupancy.holder().map(|b| b.0))
        .bind(property.updated_at)
        .bind(expected.status().as_str())
        .bind(expected.holder().map(|b| b.0))
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete_unbooked(&self, id: PropertyId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM properties WHERE id = $1 AND status = 'FREE'")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(backend)?;

        Ok(result.rows_affected() == 1)
    }
}
