//! Business logic services for the event weather server

pub mod event;
pub mod weather;

pub use event::{Event, EventService};
pub use weather::WeatherService;
