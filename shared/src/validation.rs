//! Validation utilities for forecast data and event input
//!
//! The scoring core trusts its inputs; these checks run where samples and
//! events are constructed.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::ForecastSample;

// ============================================================================
// Forecast Sample Validation
// ============================================================================

/// Reasons a forecast sample is rejected before scoring
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SampleError {
    #[error("precipitation probability {0} is outside 0..=1")]
    RainProbability(f64),

    #[error("rain volume {0}mm is negative")]
    NegativeRainVolume(f64),

    #[error("humidity {0}% is outside 0..=100")]
    Humidity(i32),

    #[error("cloud coverage {0}% is outside 0..=100")]
    CloudCoverage(i32),

    #[error("{0} is not a finite number")]
    NotFinite(&'static str),
}

/// Check the invariants every scored sample must satisfy
pub fn validate_forecast_sample(sample: &ForecastSample) -> Result<(), SampleError> {
    let floats = [
        ("temperature", sample.temperature),
        ("feels_like", sample.feels_like),
        ("min_temp", sample.min_temp),
        ("max_temp", sample.max_temp),
        ("wind_speed", sample.wind_speed),
        ("rain_probability", sample.rain_probability),
        ("rain_volume_1h", sample.rain_volume_1h),
        ("rain_volume_3h", sample.rain_volume_3h),
    ];
    if let Some((name, _)) = floats.iter().find(|(_, v)| !v.is_finite()) {
        return Err(SampleError::NotFinite(name));
    }

    if !(0.0..=1.0).contains(&sample.rain_probability) {
        return Err(SampleError::RainProbability(sample.rain_probability));
    }
    for volume in [sample.rain_volume_1h, sample.rain_volume_3h] {
        if volume < 0.0 {
            return Err(SampleError::NegativeRainVolume(volume));
        }
    }
    if !(0..=100).contains(&sample.humidity) {
        return Err(SampleError::Humidity(sample.humidity));
    }
    if !(0..=100).contains(&sample.clouds) {
        return Err(SampleError::CloudCoverage(sample.clouds));
    }
    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Reject empty or whitespace-only text fields
pub fn validate_not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        let mut error = validator::ValidationError::new("blank");
        error.message = Some("must not be empty".into());
        return Err(error);
    }
    Ok(())
}

/// Validate latitude/longitude bounds
pub fn validate_coordinates(latitude: Decimal, longitude: Decimal) -> Result<(), &'static str> {
    if latitude < Decimal::from(-90) || latitude > Decimal::from(90) {
        return Err("Latitude must be between -90 and 90");
    }
    if longitude < Decimal::from(-180) || longitude > Decimal::from(180) {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn sample() -> ForecastSample {
        ForecastSample {
            temperature: 20.0,
            feels_like: 19.5,
            min_temp: 18.0,
            max_temp: 22.0,
            pressure: 1012,
            humidity: 55,
            wind_speed: 4.0,
            wind_deg: 90,
            clouds: 40,
            weather_main: "Clouds".to_string(),
            weather_description: "scattered clouds".to_string(),
            weather_icon: "03d".to_string(),
            rain_probability: 0.1,
            rain_volume_1h: 0.0,
            rain_volume_3h: 0.0,
            forecast_time: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_valid_sample() {
        assert!(validate_forecast_sample(&sample()).is_ok());
    }

    #[test]
    fn test_rain_probability_bounds() {
        let mut s = sample();
        s.rain_probability = 1.0;
        assert!(validate_forecast_sample(&s).is_ok());
        s.rain_probability = 1.2;
        assert_eq!(validate_forecast_sample(&s), Err(SampleError::RainProbability(1.2)));
        s.rain_probability = -0.1;
        assert!(validate_forecast_sample(&s).is_err());
    }

    #[test]
    fn test_negative_volume() {
        let mut s = sample();
        s.rain_volume_3h = -2.0;
        assert_eq!(validate_forecast_sample(&s), Err(SampleError::NegativeRainVolume(-2.0)));
    }

    #[test]
    fn test_percentages() {
        let mut s = sample();
        s.humidity = 101;
        assert_eq!(validate_forecast_sample(&s), Err(SampleError::Humidity(101)));
        let mut s = sample();
        s.clouds = -1;
        assert_eq!(validate_forecast_sample(&s), Err(SampleError::CloudCoverage(-1)));
    }

    #[test]
    fn test_non_finite() {
        let mut s = sample();
        s.wind_speed = f64::NAN;
        assert_eq!(validate_forecast_sample(&s), Err(SampleError::NotFinite("wind_speed")));
    }

    #[test]
    fn test_not_blank() {
        assert!(validate_not_blank("Wedding").is_ok());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank(" \t").is_err());
    }

    #[test]
    fn test_coordinates() {
        assert!(validate_coordinates(dec("25.7907"), dec("-80.13")).is_ok());
        assert!(validate_coordinates(dec("90"), dec("180")).is_ok());
        assert!(validate_coordinates(dec("90.1"), dec("0")).is_err());
        assert!(validate_coordinates(dec("0"), dec("-180.5")).is_err());
    }
}
