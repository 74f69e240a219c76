pub mod property_client;
pub mod repository;

use haven_shared::{BookingId, ErrorKind, PropertyId, TransitionError, ValidationError};
use std::time::Duration;

pub use property_client::{PropertyClient, RemoteError};
pub use repository::{BookingRepository, PropertyRepository, StoreError, StoreResult};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error("{0} changed concurrently")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Property service call failed: {0}")]
    Remote(#[from] RemoteError),

    #[error("Property service did not answer within {0:?}")]
    Timeout(Duration),

    /// A compensating action failed after the step it was undoing had failed.
    #[error("{original}; compensating action also failed: {compensation}")]
    Compensation {
        original: Box<CoreError>,
        compensation: Box<CoreError>,
    },
}

impl CoreError {
    pub fn property_not_found(id: PropertyId) -> Self {
        CoreError::NotFound {
            entity: "property",
            id: id.0,
        }
    }

    pub fn booking_not_found(id: BookingId) -> Self {
        CoreError::NotFound {
            entity: "booking",
            id: id.0,
        }
    }

    /// The kind reported to callers. A failed compensation keeps the kind of
    /// the failure that triggered it.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::NotFound { .. } => ErrorKind::NotFound,
            CoreError::Transition(err) => err.kind(),
            CoreError::Conflict(_) => ErrorKind::Conflict,
            CoreError::Validation(_) => ErrorKind::Invalid,
            CoreError::Storage(_) => ErrorKind::Internal,
            CoreError::Remote(err) => err.kind,
            CoreError::Timeout(_) => ErrorKind::Internal,
            CoreError::Compensation { original, .. } => original.kind(),
        }
    }
}

impl From<CoreError> for RemoteError {
    fn from(err: CoreError) -> Self {
        RemoteError::new(err.kind(), err.to_string())
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
