//! Event HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use shared::{Breakdown, EventInput, ForecastSample, WeatherStatus};

use crate::error::AppResult;
use crate::services::Event;
use crate::AppState;

/// Event as returned by the API
#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub event_date: NaiveDate,
    pub weather_status: Option<WeatherStatus>,
    pub suitability_score: Option<i32>,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            name: event.name,
            event_type: event.event_type,
            location: event.location_name,
            latitude: event.latitude.to_f64().unwrap_or_default(),
            longitude: event.longitude.to_f64().unwrap_or_default(),
            event_date: event.event_date,
            weather_status: None,
            suitability_score: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SuitabilityResponse {
    pub event_id: i64,
    pub event_name: String,
    pub event_type: String,
    pub event_date: NaiveDate,
    pub location: String,
    pub suitability_score: i32,
    pub suitability_details: Breakdown,
    pub weather_at_event_time: Option<ForecastSample>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct AlternativeDateResponse {
    pub date: NaiveDate,
    pub suitability_score: i32,
    pub suitability_details: Breakdown,
    pub weather_at_date: Option<ForecastSample>,
}

/// Create a new event
pub async fn create_event(
    State(state): State<AppState>,
    Json(input): Json<EventInput>,
) -> AppResult<(StatusCode, Json<EventResponse>)> {
    let event = state.event_service().create_event(input).await?;
    Ok((StatusCode::CREATED, Json(event.into())))
}

/// List all events with their weather status
pub async fn list_events(State(state): State<AppState>) -> AppResult<Json<Vec<EventResponse>>> {
    let events = state.event_service().list_events().await?;
    let weather = state.weather_service();

    let mut response = Vec::with_capacity(events.len());
    for event in events {
        let (status, score) = weather.event_status(&event, &state.scorer).await;
        let mut item = EventResponse::from(event);
        item.weather_status = Some(status);
        item.suitability_score = score;
        response.push(item);
    }

    Ok(Json(response))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> AppResult<Json<EventResponse>> {
    let event = state.event_service().get_event(event_id).await?;
    Ok(Json(event.into()))
}

/// Update an event
pub async fn update_event(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
    Json(input): Json<EventInput>,
) -> AppResult<Json<EventResponse>> {
    let event = state.event_service().update_event(event_id, input).await?;
    Ok(Json(event.into()))
}

/// Delete an event
pub async fn delete_event(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> AppResult<StatusCode> {
    state.event_service().delete_event(event_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Suitability score for an event's own date
pub async fn get_event_suitability(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> AppResult<Json<SuitabilityResponse>> {
    let event = state.event_service().get_event(event_id).await?;
    let suitability = state
        .weather_service()
        .event_suitability(&event, &state.scorer)
        .await?;

    Ok(Json(SuitabilityResponse {
        event_id: event.id,
        event_name: event.name,
        event_type: event.event_type,
        event_date: event.event_date,
        location: event.location_name,
        suitability_score: suitability.result.score,
        suitability_details: suitability.result.breakdown,
        weather_at_event_time: Some(suitability.sample),
        message: "Suitability score calculated successfully.".to_string(),
    }))
}

/// Nearby dates with weather at least as good as the event's date
pub async fn get_alternative_dates(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> AppResult<Json<Vec<AlternativeDateResponse>>> {
    let event = state.event_service().get_event(event_id).await?;
    let today = state.clock.today();
    let candidates = state
        .weather_service()
        .alternatives(&event, &state.scorer, today, state.config.weather.horizon_days)
        .await?;

    let response = candidates
        .into_iter()
        .map(|candidate| AlternativeDateResponse {
            date: candidate.date,
            suitability_score: candidate.result.score,
            suitability_details: candidate.result.breakdown,
            weather_at_date: Some(candidate.sample),
        })
        .collect();

    Ok(Json(response))
}
