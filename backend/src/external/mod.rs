//! External API integrations

pub mod places;
pub mod weather;

pub use places::PlacesClient;
pub use weather::WeatherClient;
