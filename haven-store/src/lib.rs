pub mod app_config;
pub mod booking_repo;
pub mod clients;
pub mod database;
pub mod memory;
pub mod property_repo;

pub use booking_repo::PgBookingRepository;
pub use clients::{BookingServiceClient, ClientError, PropertyServiceClient};
pub use database::DbClient;
pub use memory::{InMemoryBookingRepository, InMemoryPropertyRepository};
pub use property_repo::PgPropertyRepository;
