pub mod error;
pub mod models;
pub mod rpc;

pub use error::{ErrorKind, TransitionError, ValidationError};
pub use models::{
    Booking, BookingDetails, BookingId, BookingStatus, NewBooking, Occupancy, Property,
    PropertyDetails, PropertyId, PropertyStatus,
};
