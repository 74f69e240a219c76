use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{BookingId, PropertyId};

/// Error classification shared by both services and the gateway.
///
/// Callers branch on the kind, never on the message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    Conflict,
    Invalid,
    Unauthorized,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Invalid => "invalid",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A status transition rejected by one of the entity state machines.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("property {property_id} is already booked by booking {holder}")]
    AlreadyBooked {
        property_id: PropertyId,
        holder: BookingId,
    },

    #[error("booking {booking_id} does not hold property {property_id}")]
    NotHolder {
        property_id: PropertyId,
        booking_id: BookingId,
        holder: Option<BookingId>,
    },

    #[error("property {property_id} is booked by booking {holder} and cannot be deleted")]
    StillBooked {
        property_id: PropertyId,
        holder: BookingId,
    },

    #[error("booking {0} is already confirmed")]
    AlreadyConfirmed(BookingId),

    #[error("booking id {0} cannot hold a reservation")]
    InvalidHolder(BookingId),
}

impl TransitionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransitionError::InvalidHolder(_) => ErrorKind::Invalid,
            _ => ErrorKind::Conflict,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field} {problem}")]
pub struct ValidationError {
    pub field: &'static str,
    pub problem: String,
}

impl ValidationError {
    pub fn new(field: &'static str, problem: impl Into<String>) -> Self {
        Self {
            field,
            problem: problem.into(),
        }
    }
}

/// Checks a required text field against its column width (in characters).
pub(crate) fn check_text(
    field: &'static str,
    value: &str,
    max_chars: usize,
    required: bool,
) -> Result<(), ValidationError> {
    if required && value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    let len = value.chars().count();
    if len > max_chars {
        return Err(ValidationError::new(
            field,
            format!("must be at most {} characters, got {}", max_chars, len),
        ));
    }
    Ok(())
}
