//! Forecast data models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Conditions forecast for a single instant (one 3-hour slot)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    pub temperature: f64,
    pub feels_like: f64,
    pub min_temp: f64,
    pub max_temp: f64,
    /// Barometric pressure in hPa
    pub pressure: i32,
    pub humidity: i32,
    /// Wind speed in m/s
    pub wind_speed: f64,
    pub wind_deg: i32,
    /// Cloud coverage percent
    pub clouds: i32,
    /// Primary sky condition ("Clear", "Clouds", "Rain", ...)
    pub weather_main: String,
    pub weather_description: String,
    pub weather_icon: String,
    /// Probability of precipitation (0-1)
    #[serde(default)]
    pub rain_probability: f64,
    /// Rain volume for the last hour, mm
    #[serde(default)]
    pub rain_volume_1h: f64,
    /// Rain volume for the last 3 hours, mm
    #[serde(default)]
    pub rain_volume_3h: f64,
    /// Forecast time (UTC)
    #[serde(rename = "dt_txt")]
    pub forecast_time: DateTime<Utc>,
}

impl ForecastSample {
    /// Calendar date (UTC) this sample belongs to
    pub fn date(&self) -> NaiveDate {
        self.forecast_time.date_naive()
    }

    /// Wind speed converted from m/s to km/h
    pub fn wind_speed_kmh(&self) -> f64 {
        self.wind_speed * 3.6
    }

    pub fn sky_class(&self) -> SkyClass {
        SkyClass::from_condition(&self.weather_main)
    }
}

/// Coarse grouping of the provider's primary sky condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkyClass {
    /// Clear or cloudy
    Fair,
    /// Drizzle, mist, smoke, haze and other visibility problems
    ReducedVisibility,
    /// Rain, snow, thunderstorm and anything unrecognised
    Poor,
}

impl SkyClass {
    /// Classify an OpenWeatherMap `weather.main` value (case-sensitive)
    pub fn from_condition(condition: &str) -> Self {
        match condition {
            "Clear" | "Clouds" => SkyClass::Fair,
            "Drizzle" | "Mist" | "Smoke" | "Haze" | "Fog" | "Sand" | "Dust" | "Ash"
            | "Squall" | "Tornado" => SkyClass::ReducedVisibility,
            _ => SkyClass::Poor,
        }
    }
}

/// Forecast samples covering the provider horizon at a fixed cadence.
///
/// Order is whatever the provider returned; consumers must not rely on
/// the samples being sorted or on every date being present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ForecastSeries {
    pub samples: Vec<ForecastSample>,
}

impl ForecastSeries {
    pub fn new(samples: Vec<ForecastSample>) -> Self {
        Self { samples }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ForecastSample> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl From<Vec<ForecastSample>> for ForecastSeries {
    fn from(samples: Vec<ForecastSample>) -> Self {
        Self::new(samples)
    }
}

impl<'a> IntoIterator for &'a ForecastSeries {
    type Item = &'a ForecastSample;
    type IntoIter = std::slice::Iter<'a, ForecastSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
