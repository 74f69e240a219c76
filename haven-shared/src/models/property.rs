use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{BookingId, PropertyId, UnknownStatus};
use crate::error::{check_text, TransitionError, ValidationError};

pub const NAME_MAX: usize = 60;
pub const DESCRIPTION_MAX: usize = 100;
pub const OWNER_NAME_MAX: usize = 60;
pub const ADDRESS_MAX: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyStatus {
    Free,
    Booked,
}

impl PropertyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyStatus::Free => "FREE",
            PropertyStatus::Booked => "BOOKED",
        }
    }
}

impl fmt::Display for PropertyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FREE" => Ok(PropertyStatus::Free),
            "BOOKED" => Ok(PropertyStatus::Booked),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Reservation state of a property. A booked property always names its holder.
///
/// On the wire this flattens to `"status": "FREE"` or
/// `"status": "BOOKED", "booking_id": <id>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Occupancy {
    Free,
    Booked { booking_id: BookingId },
}

impl Occupancy {
    pub fn status(&self) -> PropertyStatus {
        match self {
            Occupancy::Free => PropertyStatus::Free,
            Occupancy::Booked { .. } => PropertyStatus::Booked,
        }
    }

    /// The reservation holder, if any.
    pub fn holder(&self) -> Option<BookingId> {
        match self {
            Occupancy::Free => None,
            Occupancy::Booked { booking_id } => Some(*booking_id),
        }
    }

    /// Rebuilds the occupancy from its stored columns.
    /// Returns `None` when the columns contradict each other.
    pub fn from_parts(status: PropertyStatus, holder: Option<BookingId>) -> Option<Self> {
        match (status, holder) {
            (PropertyStatus::Free, None) => Some(Occupancy::Free),
            (PropertyStatus::Booked, Some(booking_id)) if booking_id.0 > 0 => {
                Some(Occupancy::Booked { booking_id })
            }
            _ => None,
        }
    }
}

/// The user-settable fields of a property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDetails {
    pub name: String,
    pub description: String,
    pub owner_name: String,
    pub address: String,
}

impl PropertyDetails {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_text("name", &self.name, NAME_MAX, true)?;
        check_text("description", &self.description, DESCRIPTION_MAX, false)?;
        check_text("owner_name", &self.owner_name, OWNER_NAME_MAX, true)?;
        check_text("address", &self.address, ADDRESS_MAX, false)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: PropertyId,
    pub name: String,
    pub description: String,
    pub owner_name: String,
    pub address: String,
    #[serde(flatten)]
    pub occupancy: Occupancy,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Property {
    /// A freshly stored property. Properties always start out free.
    pub fn new(id: PropertyId, details: PropertyDetails) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: details.name,
            description: details.description,
            owner_name: details.owner_name,
            address: details.address,
            occupancy: Occupancy::Free,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn status(&self) -> PropertyStatus {
        self.occupancy.status()
    }

    pub fn details(&self) -> PropertyDetails {
        PropertyDetails {
            name: self.name.clone(),
            description: self.description.clone(),
            owner_name: self.owner_name.clone(),
            address: self.address.clone(),
        }
    }

    pub fn apply_details(&mut self, details: PropertyDetails) {
        self.name = details.name;
        self.description = details.description;
        self.owner_name = details.owner_name;
        self.address = details.address;
        self.updated_at = Utc::now();
    }

    /// FREE -> BOOKED. Only a free property can be booked.
    pub fn book(&mut self, booking_id: BookingId) -> Result<(), TransitionError> {
        if booking_id.0 <= 0 {
            return Err(TransitionError::InvalidHolder(booking_id));
        }
        match self.occupancy {
            Occupancy::Free => {
                self.occupancy = Occupancy::Booked { booking_id };
                self.updated_at = Utc::now();
                Ok(())
            }
            Occupancy::Booked { booking_id: holder } => Err(TransitionError::AlreadyBooked {
                property_id: self.id,
                holder,
            }),
        }
    }

    /// BOOKED -> FREE. Only the reservation holder may release the property.
    pub fn release(&mut self, booking_id: BookingId) -> Result<(), TransitionError> {
        match self.occupancy {
            Occupancy::Booked { booking_id: holder } if holder == booking_id => {
                self.occupancy = Occupancy::Free;
                self.updated_at = Utc::now();
                Ok(())
            }
            occupancy => Err(TransitionError::NotHolder {
                property_id: self.id,
                booking_id,
                holder: occupancy.holder(),
            }),
        }
    }

    pub fn ensure_deletable(&self) -> Result<(), TransitionError> {
        match self.occupancy {
            Occupancy::Free => Ok(()),
            Occupancy::Booked { booking_id } => Err(TransitionError::StillBooked {
                property_id: self.id,
                holder: booking_id,
            }),
        }
    }
}
