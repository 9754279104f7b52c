//! Configuration management for the event weather server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with EWS_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    pub server: ServerConfig,

    pub database: DatabaseConfig,

    /// OpenWeatherMap forecast provider
    pub weather: WeatherConfig,

    /// Google Places geocoder
    pub places: PlacesConfig,

    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    pub base_url: String,

    pub api_key: String,

    /// How long a fetched forecast series is reused for the same coordinates
    pub cache_ttl_minutes: i64,

    /// Days after today within which alternative dates are admissible
    pub horizon_days: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PlacesConfig {
    pub base_url: String,

    pub api_key: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    /// Origins allowed to call the API from a browser; "*" allows any
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("EWS_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            .set_default("environment", environment.clone())?
            .set_default("server.port", 8000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("weather.base_url", "https://api.openweathermap.org/data/2.5")?
            .set_default("weather.api_key", "")?
            .set_default("weather.cache_ttl_minutes", 180)?
            .set_default("weather.horizon_days", shared::DEFAULT_HORIZON_DAYS)?
            .set_default("places.base_url", "https://maps.googleapis.com/maps/api/place")?
            .set_default("places.api_key", "")?
            .set_default("cors.allowed_origins", vec!["http://localhost:3000"])?
            // Environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Environment variables (EWS_ prefix), e.g. EWS_WEATHER__API_KEY
            .add_source(
                Environment::with_prefix("EWS")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}
