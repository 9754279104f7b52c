//! HTTP handlers for the event weather server

pub mod events;
pub mod health;
pub mod weather;

pub use events::*;
pub use health::*;
pub use weather::*;
