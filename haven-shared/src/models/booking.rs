use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{BookingId, PropertyId, UnknownStatus};
use crate::error::{check_text, TransitionError, ValidationError};

pub const CUSTOMER_NAME_MAX: usize = 60;
pub const COMMENT_MAX: usize = 100;

/// Booking status in the lifecycle.
///
/// There is no failed state: a booking whose confirmation fails is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(BookingStatus::Pending),
            "CONFIRMED" => Ok(BookingStatus::Confirmed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBooking {
    pub customer_name: String,
    #[serde(default)]
    pub comment: String,
    pub property_id: PropertyId,
}

impl NewBooking {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_text("customer_name", &self.customer_name, CUSTOMER_NAME_MAX, true)?;
        check_text("comment", &self.comment, COMMENT_MAX, false)?;
        if self.property_id.0 <= 0 {
            return Err(ValidationError::new("property_id", "must reference a property"));
        }
        Ok(())
    }
}

/// Fields a customer may change on an existing booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDetails {
    pub customer_name: String,
    #[serde(default)]
    pub comment: String,
}

impl BookingDetails {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_text("customer_name", &self.customer_name, CUSTOMER_NAME_MAX, true)?;
        check_text("comment", &self.comment, COMMENT_MAX, false)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub customer_name: String,
    pub comment: String,
    pub property_id: PropertyId,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// A freshly stored booking, always pending until the property confirms it.
    pub fn new(id: BookingId, new_booking: NewBooking) -> Self {
        let now = Utc::now();
        Self {
            id,
            customer_name: new_booking.customer_name,
            comment: new_booking.comment,
            property_id: new_booking.property_id,
            status: BookingStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Transition: Pending -> Confirmed (property reserved)
    pub fn confirm(&mut self) -> Result<(), TransitionError> {
        if self.status != BookingStatus::Pending {
            return Err(TransitionError::AlreadyConfirmed(self.id));
        }
        self.status = BookingStatus::Confirmed;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Only customer name and comment are editable; status and property stay put.
    pub fn apply_details(&mut self, details: BookingDetails) {
        self.customer_name = details.customer_name;
        self.comment = details.comment;
        self.updated_at = Utc::now();
    }
}
