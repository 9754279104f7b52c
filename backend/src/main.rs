//! Weather-Aware Event Planning - Backend Server
//!
//! Stores planned outdoor events, scores their dates against the
//! OpenWeatherMap 5-day forecast and suggests nearby dates with better weather.

use axum::{http::HeaderValue, Router};
use shared::{Clock, SuitabilityScorer, SystemClock};
use sqlx::postgres::PgPoolOptions;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod external;
mod handlers;
mod routes;
mod services;

pub use config::Config;
use external::{PlacesClient, WeatherClient};
use services::{EventService, WeatherService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: Arc<Config>,
    pub weather: WeatherClient,
    pub places: PlacesClient,
    pub scorer: Arc<SuitabilityScorer>,
    /// Source of "today" for alternative-date admissibility
    pub clock: Arc<dyn Clock + Send + Sync>,
}

impl AppState {
    pub fn event_service(&self) -> EventService {
        EventService::new(self.db.clone(), self.places.clone())
    }

    pub fn weather_service(&self) -> WeatherService {
        WeatherService::new(
            self.db.clone(),
            self.weather.clone(),
            self.config.weather.cache_ttl_minutes,
        )
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "event_weather_server=debug,tower_http=debug,sqlx=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting Weather-Aware Event Planning Server");
    tracing::info!("Environment: {}", config.environment);

    if config.weather.api_key.trim().is_empty() || config.places.api_key.trim().is_empty() {
        anyhow::bail!("EWS_WEATHER__API_KEY and EWS_PLACES__API_KEY must be set");
    }

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&config.database.url)
        .await?;

    tracing::info!("Database connection established");

    // Run migrations in development
    if config.is_development() {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&db_pool).await?;
        tracing::info!("Migrations completed");
    }

    let state = AppState {
        db: db_pool,
        weather: WeatherClient::new(config.weather.api_key.clone(), config.weather.base_url.clone()),
        places: PlacesClient::new(config.places.api_key.clone(), config.places.base_url.clone()),
        scorer: Arc::new(SuitabilityScorer::default()),
        clock: Arc::new(SystemClock),
        config: Arc::new(config.clone()),
    };

    let app = create_app(state)?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> anyhow::Result<Router> {
    let cors = cors_layer(&state.config.cors.allowed_origins)?;

    Ok(routes::api_routes()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state))
}

/// CORS for the configured origins; "*" allows any origin
fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.iter().any(|o| o == "*") {
        return Ok(layer.allow_origin(Any));
    }

    let origins = origins
        .iter()
        .map(|o| o.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(layer.allow_origin(origins))
}
