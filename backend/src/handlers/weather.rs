//! HTTP handlers for forecast and geocoding lookups

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use shared::{ForecastSample, ResolvedLocation};

use crate::error::{AppError, AppResult};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct WeatherForecastResponse {
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub date: NaiveDate,
    pub forecast: Option<ForecastSample>,
    pub message: String,
}

/// Forecast for a free-text location on one date
pub async fn get_weather_forecast(
    State(state): State<AppState>,
    Path((location, date)): Path<(String, NaiveDate)>,
) -> AppResult<Json<WeatherForecastResponse>> {
    let resolved = state.places.geocode(&location).await?;
    let forecast = state
        .weather_service()
        .forecast_for_date(resolved.latitude, resolved.longitude, date)
        .await?;

    let message = match &forecast {
        Some(sample) => format!(
            "Forecast for {} at {} UTC.",
            date,
            sample.forecast_time.format("%H:%M")
        ),
        None => format!(
            "No precise forecast available for {} within the 5-day window. \
             The OpenWeatherMap 5-day forecast provides data every 3 hours.",
            date
        ),
    };

    Ok(Json(WeatherForecastResponse {
        location: resolved.formatted_address,
        latitude: resolved.latitude.to_f64().unwrap_or_default(),
        longitude: resolved.longitude.to_f64().unwrap_or_default(),
        date,
        forecast,
        message,
    }))
}

#[derive(Debug, Deserialize)]
pub struct GeocodeQuery {
    pub query: String,
}

/// Resolve a place name to coordinates
pub async fn geocode(
    State(state): State<AppState>,
    Query(params): Query<GeocodeQuery>,
) -> AppResult<Json<ResolvedLocation>> {
    if params.query.trim().is_empty() {
        return Err(AppError::Validation {
            field: "query".to_string(),
            message: "query must not be empty".to_string(),
        });
    }

    let resolved = state.places.geocode(params.query.trim()).await?;
    Ok(Json(resolved))
}
