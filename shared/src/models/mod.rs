//! Domain models for the event weather planner

mod event;
mod suitability;
mod weather;

pub use event::*;
pub use suitability::*;
pub use weather::*;
