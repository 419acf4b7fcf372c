// raptly-api: Async Rust client for the RAPT brewing cloud API

pub mod brewzilla;
mod client;
pub mod endpoints;
pub mod error;
pub mod hydrometer;
pub mod temperature;
pub mod token;
pub mod transport;

pub use brewzilla::BrewZillaClient;
pub use endpoints::ApiEndpoints;
pub use error::Error;
pub use hydrometer::HydrometerClient;
pub use temperature::TemperatureControllerClient;
pub use token::TokenManager;
pub use transport::TransportConfig;
