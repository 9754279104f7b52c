//! Event management service
//!
//! Events are stored with the geocoder's formatted address and coordinates
//! rather than the free text the user typed.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::EventInput;
use sqlx::PgPool;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::external::PlacesClient;

const EVENT_COLUMNS: &str =
    "id, name, event_type, location_name, latitude, longitude, event_date, created_at, updated_at";

/// Event service for managing planned events
#[derive(Clone)]
pub struct EventService {
    db: PgPool,
    places: PlacesClient,
}

/// Stored event
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub event_type: String,
    pub location_name: String,
    pub latitude: Decimal,
    pub longitude: Decimal,
    pub event_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EventService {
    pub fn new(db: PgPool, places: PlacesClient) -> Self {
        Self { db, places }
    }

    /// List all events, soonest first
    pub async fn list_events(&self) -> AppResult<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {} FROM events ORDER BY event_date, id",
            EVENT_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(events)
    }

    pub async fn get_event(&self, event_id: i64) -> AppResult<Event> {
        sqlx::query_as::<_, Event>(&format!("SELECT {} FROM events WHERE id = $1", EVENT_COLUMNS))
            .bind(event_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Event".to_string()))
    }

    /// Create an event, geocoding its location
    pub async fn create_event(&self, input: EventInput) -> AppResult<Event> {
        input.validate()?;
        if !input.has_category_rules() {
            tracing::debug!(event_type = %input.event_type, "Category has no dedicated rules");
        }

        let location = self.places.geocode(&input.location).await?;
        tracing::info!(
            query = %input.location,
            address = %location.formatted_address,
            latitude = %location.latitude,
            longitude = %location.longitude,
            "Geocoded event location"
        );

        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            INSERT INTO events (name, event_type, location_name, latitude, longitude, event_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            EVENT_COLUMNS
        ))
        .bind(input.name.trim())
        .bind(input.event_type.trim())
        .bind(&location.formatted_address)
        .bind(location.latitude)
        .bind(location.longitude)
        .bind(input.event_date)
        .fetch_one(&self.db)
        .await?;

        Ok(event)
    }

    /// Update an event. The location is geocoded again only when its text
    /// differs from the stored address.
    pub async fn update_event(&self, event_id: i64, input: EventInput) -> AppResult<Event> {
        input.validate()?;

        let existing = self.get_event(event_id).await?;

        let (location_name, latitude, longitude) = if existing.location_name != input.location {
            let location = self.places.geocode(&input.location).await?;
            tracing::info!(
                event_id,
                address = %location.formatted_address,
                "Re-geocoded event location"
            );
            (location.formatted_address, location.latitude, location.longitude)
        } else {
            (existing.location_name, existing.latitude, existing.longitude)
        };

        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET name = $1, event_type = $2, location_name = $3, latitude = $4,
                longitude = $5, event_date = $6, updated_at = NOW()
            WHERE id = $7
            RETURNING {}
            "#,
            EVENT_COLUMNS
        ))
        .bind(input.name.trim())
        .bind(input.event_type.trim())
        .bind(&location_name)
        .bind(latitude)
        .bind(longitude)
        .bind(input.event_date)
        .bind(event_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Event".to_string()))?;

        Ok(event)
    }

    pub async fn delete_event(&self, event_id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(event_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Event".to_string()));
        }

        tracing::info!(event_id, "Deleted event");
        Ok(())
    }
}
