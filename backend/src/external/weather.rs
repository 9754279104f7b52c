//! Weather API client for fetching forecast series
//!
//! Integrates with the OpenWeatherMap 5-day / 3-hour forecast API

use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::{validate_forecast_sample, ForecastSample, ForecastSeries};

use crate::error::{AppError, AppResult};

const PROVIDER: &str = "OpenWeatherMap";

/// Weather API client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
}

/// OpenWeatherMap API response for forecast
#[derive(Debug, Deserialize)]
struct OWMForecastResponse {
    #[serde(default)]
    list: Vec<OWMForecastItem>,
}

#[derive(Debug, Deserialize)]
struct OWMForecastItem {
    dt: i64,
    dt_txt: Option<String>,
    main: OWMMain,
    #[serde(default)]
    weather: Vec<OWMWeather>,
    clouds: OWMClouds,
    wind: OWMWind,
    pop: Option<f64>,
    rain: Option<OWMRain>,
}

#[derive(Debug, Deserialize)]
struct OWMWeather {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OWMMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    pressure: i32,
    humidity: i32,
}

#[derive(Debug, Deserialize)]
struct OWMWind {
    speed: f64,
    deg: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct OWMClouds {
    all: i32,
}

#[derive(Debug, Deserialize)]
struct OWMRain {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
    #[serde(rename = "3h")]
    three_hour: Option<f64>,
}

impl WeatherClient {
    pub fn new(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch the 5-day / 3-hour forecast series for a coordinate pair
    pub async fn get_forecast(&self, latitude: Decimal, longitude: Decimal) -> AppResult<ForecastSeries> {
        let url = format!("{}/forecast", self.base_url);
        tracing::debug!(%latitude, %longitude, "Fetching forecast from {}", PROVIDER);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
            ])
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

        let data: OWMForecastResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("Failed to parse forecast response: {}", e)))?;

        Ok(convert_forecast_response(data))
    }
}

/// Map a non-success upstream status to an application error
pub fn provider_status_error(provider: &'static str, status: StatusCode, body: &str) -> AppError {
    match status {
        StatusCode::UNAUTHORIZED => AppError::ProviderUnauthorized(provider),
        StatusCode::TOO_MANY_REQUESTS => AppError::ProviderRateLimited(provider),
        _ => AppError::ExternalService(format!("{} API error: {} - {}", provider, status, body)),
    }
}

/// Convert an OpenWeatherMap forecast response into a validated series
fn convert_forecast_response(data: OWMForecastResponse) -> ForecastSeries {
    data.list
        .into_iter()
        .filter_map(|item| {
            let dt = item.dt;
            let Some(sample) = convert_item(item) else {
                tracing::warn!(dt, "Dropping forecast item with an unreadable timestamp");
                return None;
            };
            match validate_forecast_sample(&sample) {
                Ok(()) => Some(sample),
                Err(e) => {
                    tracing::warn!(time = %sample.forecast_time, "Dropping forecast item: {}", e);
                    None
                }
            }
        })
        .collect::<Vec<_>>()
        .into()
}

fn convert_item(item: OWMForecastItem) -> Option<ForecastSample> {
    let forecast_time = item
        .dt_txt
        .as_deref()
        .and_then(parse_dt_txt)
        .or_else(|| DateTime::from_timestamp(item.dt, 0))?;
    let weather = item.weather.into_iter().next();
    let (rain_1h, rain_3h) = item
        .rain
        .map(|r| (r.one_hour.unwrap_or(0.0), r.three_hour.unwrap_or(0.0)))
        .unwrap_or((0.0, 0.0));

    Some(ForecastSample {
        temperature: item.main.temp,
        feels_like: item.main.feels_like,
        min_temp: item.main.temp_min,
        max_temp: item.main.temp_max,
        pressure: item.main.pressure,
        humidity: item.main.humidity,
        wind_speed: item.wind.speed,
        wind_deg: item.wind.deg.unwrap_or(0),
        clouds: item.clouds.all,
        weather_main: weather.as_ref().map(|w| w.main.clone()).unwrap_or_default(),
        weather_description: weather.as_ref().map(|w| w.description.clone()).unwrap_or_default(),
        weather_icon: weather.map(|w| w.icon).unwrap_or_default(),
        rain_probability: item.pop.unwrap_or(0.0),
        rain_volume_1h: rain_1h,
        rain_volume_3h: rain_3h,
        forecast_time,
    })
}

/// `dt_txt` is "YYYY-MM-DD HH:MM:SS" in UTC
fn parse_dt_txt(text: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}
