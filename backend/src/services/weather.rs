//! Weather service: cached forecast retrieval and event suitability
//!
//! Forecast series come from the provider at most once per coordinate pair
//! per cache period; selection, scoring and ranking are delegated to `shared`.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use shared::{
    select_sample_for_date, AlternativeCandidate, ForecastSample, ForecastSeries,
    SuitabilityResult, SuitabilityScorer, WeatherStatus,
};
use sqlx::{FromRow, PgPool};

use crate::error::{AppError, AppResult};
use crate::external::WeatherClient;
use crate::services::event::Event;

const PURGE_EXPIRED_FORECASTS: &str = "DELETE FROM weather_forecasts WHERE expires_at <= NOW()";

/// Cache lifetime; negative values disable reuse, oversized values saturate
fn cache_ttl(minutes: i64) -> Duration {
    Duration::try_minutes(minutes.max(0)).unwrap_or(Duration::MAX)
}

fn cache_expiry(fetched_at: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    fetched_at
        .checked_add_signed(ttl)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Weather service for forecast lookups and scoring
#[derive(Clone)]
pub struct WeatherService {
    db: PgPool,
    weather_client: WeatherClient,
    cache_ttl: Duration,
}

/// Cached forecast series
#[derive(Debug, Clone, FromRow)]
pub struct CachedForecast {
    pub id: i64,
    pub latitude: Decimal,
    pub longitude: Decimal,
    pub samples: serde_json::Value,
    pub fetched_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// The sample chosen for an event's date and its score
#[derive(Debug, Clone)]
pub struct EventSuitability {
    pub sample: ForecastSample,
    pub result: SuitabilityResult,
}

impl WeatherService {
    pub fn new(db: PgPool, weather_client: WeatherClient, cache_ttl_minutes: i64) -> Self {
        Self {
            db,
            weather_client,
            cache_ttl: cache_ttl(cache_ttl_minutes),
        }
    }

    // ========================================================================
    // Forecast Cache
    // ========================================================================

    /// Cache a forecast series for a coordinate pair
    pub async fn cache_forecast(
        &self,
        latitude: Decimal,
        longitude: Decimal,
        series: &ForecastSeries,
    ) -> AppResult<CachedForecast> {
        let samples = serde_json::to_value(series).map_err(|e| AppError::Internal(e.to_string()))?;
        let expires_at = cache_expiry(Utc::now(), self.cache_ttl);

        let mut tx = self.db.begin().await?;

        let purged = sqlx::query(PURGE_EXPIRED_FORECASTS)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if purged > 0 {
            tracing::debug!(purged, "Purged expired cached forecasts");
        }

        let cached = sqlx::query_as::<_, CachedForecast>(
            r#"
            INSERT INTO weather_forecasts (latitude, longitude, samples, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, latitude, longitude, samples, fetched_at, expires_at
            "#,
        )
        .bind(latitude)
        .bind(longitude)
        .bind(&samples)
        .bind(expires_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(cached)
    }

    /// Get a cached series within 0.01° of the coordinates, if not expired
    pub async fn get_cached_forecast(
        &self,
        latitude: Decimal,
        longitude: Decimal,
    ) -> AppResult<Option<ForecastSeries>> {
        let cached = sqlx::query_as::<_, CachedForecast>(
            r#"
            SELECT id, latitude, longitude, samples, fetched_at, expires_at
            FROM weather_forecasts
            WHERE ABS(latitude - $1) < 0.01
              AND ABS(longitude - $2) < 0.01
              AND expires_at > NOW()
            ORDER BY fetched_at DESC
            LIMIT 1
            "#,
        )
        .bind(latitude)
        .bind(longitude)
        .fetch_optional(&self.db)
        .await?;

        match cached {
            Some(row) => match serde_json::from_value::<ForecastSeries>(row.samples) {
                Ok(series) => {
                    tracing::debug!(
                        cache_id = row.id,
                        fetched_at = %row.fetched_at,
                        expires_at = %row.expires_at,
                        "Forecast cache hit"
                    );
                    Ok(Some(series))
                }
                Err(e) => {
                    tracing::warn!(cache_id = row.id, "Ignoring unreadable cached forecast: {}", e);
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Fetch a forecast series (from cache or API)
    pub async fn get_forecast(&self, latitude: Decimal, longitude: Decimal) -> AppResult<ForecastSeries> {
        if let Some(series) = self.get_cached_forecast(latitude, longitude).await? {
            return Ok(series);
        }

        let series = self.weather_client.get_forecast(latitude, longitude).await?;

        if let Err(e) = self.cache_forecast(latitude, longitude, &series).await {
            tracing::warn!("Failed to cache forecast: {}", e);
        }

        Ok(series)
    }

    /// The sample representing `date` at the coordinates, if the forecast covers it
    pub async fn forecast_for_date(
        &self,
        latitude: Decimal,
        longitude: Decimal,
        date: NaiveDate,
    ) -> AppResult<Option<ForecastSample>> {
        let series = self.get_forecast(latitude, longitude).await?;
        Ok(select_sample_for_date(&series, date).cloned())
    }

    // ========================================================================
    // Event Suitability
    // ========================================================================

    /// Score an event's date; `NoForecast` when the series has no sample for it
    pub async fn event_suitability(
        &self,
        event: &Event,
        scorer: &SuitabilityScorer,
    ) -> AppResult<EventSuitability> {
        let sample = self
            .forecast_for_date(event.latitude, event.longitude, event.event_date)
            .await?
            .ok_or(AppError::NoForecast(event.event_date))?;
        let result = scorer.score(&event.event_type, &sample);

        tracing::debug!(event_id = event.id, score = result.score, "Scored event");
        Ok(EventSuitability { sample, result })
    }

    /// Summary status for the event list; provider failures are reported inline
    pub async fn event_status(
        &self,
        event: &Event,
        scorer: &SuitabilityScorer,
    ) -> (WeatherStatus, Option<i32>) {
        match self.event_suitability(event, scorer).await {
            Ok(suitability) => {
                let score = suitability.result.score;
                (WeatherStatus::from_score(score), Some(score))
            }
            Err(AppError::NoForecast(_)) => (WeatherStatus::ForecastUnavailable, None),
            Err(e) => {
                tracing::warn!(event_id = event.id, "Weather lookup failed: {}", e);
                (WeatherStatus::Error(e.detail()), None)
            }
        }
    }

    /// Dates within two days of the event at least as suitable as the event's own
    pub async fn alternatives(
        &self,
        event: &Event,
        scorer: &SuitabilityScorer,
        today: NaiveDate,
        horizon_days: i64,
    ) -> AppResult<Vec<AlternativeCandidate>> {
        let series = self.get_forecast(event.latitude, event.longitude).await?;
        let ranked = scorer.rank_alternatives(
            &series,
            &event.event_type,
            event.event_date,
            today,
            horizon_days,
        );

        tracing::debug!(
            event_id = event.id,
            %today,
            candidates = ranked.len(),
            "Ranked alternative dates"
        );
        Ok(ranked)
    }
}
