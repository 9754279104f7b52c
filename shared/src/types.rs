//! Common types used across the platform

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A free-text place resolved by the geocoder
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolvedLocation {
    pub formatted_address: String,
    pub latitude: Decimal,
    pub longitude: Decimal,
}
