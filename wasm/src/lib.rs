//! WebAssembly module for the Weather-Aware Event Planner
//!
//! Provides client-side computation for:
//! - Suitability scoring of a forecast sample
//! - Weather status labels for a score
//! - Offline validation of forecast samples and coordinates

use rust_decimal::Decimal;
use serde::Serialize;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::scoring::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::debug_1(&JsValue::from_str("event-weather-wasm loaded"));
}

#[derive(Serialize)]
struct ScoreOutput {
    score: i32,
    breakdown: Breakdown,
}

/// Score a forecast sample (JSON, provider field names) for an event category.
/// Returns `{"score": .., "breakdown": {..}}` as JSON.
#[wasm_bindgen]
pub fn score_forecast(category: &str, sample_json: &str) -> Result<String, JsValue> {
    score_forecast_json(category, sample_json).map_err(|e| JsValue::from_str(&e))
}

fn score_forecast_json(category: &str, sample_json: &str) -> Result<String, String> {
    let sample: ForecastSample =
        serde_json::from_str(sample_json).map_err(|e| format!("Invalid sample JSON: {}", e))?;
    validate_forecast_sample(&sample).map_err(|e| format!("Invalid sample: {}", e))?;

    let result = calculate_suitability(category, &sample);
    serde_json::to_string(&ScoreOutput {
        score: result.score,
        breakdown: result.breakdown,
    })
    .map_err(|e| e.to_string())
}

/// Status label ("Excellent", "Good", "Fair", "Poor") for a score
#[wasm_bindgen]
pub fn weather_status_for_score(score: i32) -> String {
    WeatherStatus::from_score(score).to_string()
}

/// Categories with their own scoring adjustments
#[wasm_bindgen]
pub fn known_event_categories() -> js_sys::Array {
    default_category_names().map(JsValue::from_str).collect()
}

/// Check latitude/longitude bounds before submitting a location
#[wasm_bindgen]
pub fn validate_event_coordinates(latitude: f64, longitude: f64) -> bool {
    match (Decimal::try_from(latitude), Decimal::try_from(longitude)) {
        (Ok(lat), Ok(lon)) => validate_coordinates(lat, lon).is_ok(),
        _ => false,
    }
}
