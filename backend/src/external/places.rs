//! Google Places text search, used to geocode free-text locations

use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::{validate_coordinates, ResolvedLocation};

use crate::error::{AppError, AppResult};
use crate::external::weather::provider_status_error;

const PROVIDER: &str = "Google Places";

#[derive(Clone)]
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct TextSearchResponse {
    status: String,
    #[serde(default)]
    results: Vec<TextSearchResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TextSearchResult {
    formatted_address: String,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

impl PlacesClient {
    pub fn new(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Resolve a place name to coordinates and a canonical address
    pub async fn geocode(&self, place: &str) -> AppResult<ResolvedLocation> {
        let url = format!("{}/textsearch/json", self.base_url);
        tracing::debug!(place, "Geocoding with {}", PROVIDER);

        let response = self
            .client
            .get(&url)
            .query(&[("query", place), ("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                AppError::ProviderUnreachable(format!(
                    "Network error communicating with {}: {}",
                    PROVIDER, e
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(provider_status_error(PROVIDER, status, &body));
        }

        let data: TextSearchResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("Failed to parse places response: {}", e)))?;

        resolve(place, data)
    }
}

fn resolve(place: &str, data: TextSearchResponse) -> AppResult<ResolvedLocation> {
    match data.status.as_str() {
        "OK" => {
            let first = data
                .results
                .into_iter()
                .next()
                .ok_or_else(|| AppError::LocationNotFound(place.to_string()))?;
            to_location(first)
        }
        "ZERO_RESULTS" => Err(AppError::LocationNotFound(place.to_string())),
        other => Err(AppError::ExternalService(format!(
            "{} API error: {} - {}",
            PROVIDER,
            other,
            data.error_message.as_deref().unwrap_or("Unknown error")
        ))),
    }
}

fn to_location(result: TextSearchResult) -> AppResult<ResolvedLocation> {
    let latitude = Decimal::from_f64_retain(result.geometry.location.lat)
        .ok_or_else(|| AppError::ExternalService("Invalid latitude in places response".to_string()))?;
    let longitude = Decimal::from_f64_retain(result.geometry.location.lng)
        .ok_or_else(|| AppError::ExternalService("Invalid longitude in places response".to_string()))?;
    validate_coordinates(latitude, longitude).map_err(|msg| AppError::ExternalService(msg.to_string()))?;

    Ok(ResolvedLocation {
        formatted_address: result.formatted_address,
        latitude,
        longitude,
    })
}
