pub mod local_client;
pub mod service;

pub use local_client::LocalPropertyClient;
pub use service::PropertyService;
