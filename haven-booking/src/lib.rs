pub mod saga;

pub use saga::{BookingService, DEFAULT_CALL_TIMEOUT};
