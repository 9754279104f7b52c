//! Route definitions for the event weather server

use axum::{
    routing::get,
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .nest("/events", event_routes())
        .route("/weather/:location/:date", get(handlers::get_weather_forecast))
        .route("/geocode", get(handlers::geocode))
}

/// Event management and suitability routes
fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_events).post(handlers::create_event))
        .route(
            "/:event_id",
            get(handlers::get_event)
                .put(handlers::update_event)
                .delete(handlers::delete_event),
        )
        .route("/:event_id/suitability", get(handlers::get_event_suitability))
        .route("/:event_id/alternatives", get(handlers::get_alternative_dates))
}
