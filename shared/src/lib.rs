//! Shared types and the weather suitability engine for the Event Weather Planner
//!
//! Everything here is pure: the backend supplies forecast series, event
//! categories and the current date, and this crate picks, scores and ranks.
//! The same code is compiled to WASM for the browser.

pub mod clock;
pub mod models;
pub mod ranking;
pub mod scoring;
pub mod selection;
pub mod types;
pub mod validation;

pub use clock::*;
pub use models::*;
pub use ranking::*;
pub use scoring::*;
pub use selection::*;
pub use types::*;
pub use validation::*;
