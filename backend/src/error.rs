//! Error handling for the event weather server
//!
//! Every error leaves the API as `{"error": {"code", "message", "field"?}}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Location '{0}' not found")]
    LocationNotFound(String),

    #[error("No forecast available for {0}")]
    NoForecast(chrono::NaiveDate),

    // External service errors
    #[error("{0} rejected the API key")]
    ProviderUnauthorized(&'static str),

    #[error("{0} rate limit exceeded")]
    ProviderRateLimited(&'static str),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Network error: {0}")]
    ProviderUnreachable(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) | AppError::LocationNotFound(_) | AppError::NoForecast(_) => {
                StatusCode::NOT_FOUND
            }
            AppError::ProviderUnauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::ProviderRateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::ExternalService(_) => StatusCode::BAD_GATEWAY,
            AppError::ProviderUnreachable(_)
            | AppError::DatabaseError(_)
            | AppError::Internal(_)
            | AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short text used where an error is reported inline instead of as a response
    pub fn detail(&self) -> String {
        match self {
            AppError::ProviderUnauthorized(provider) => format!("Invalid {} API key.", provider),
            AppError::ProviderRateLimited(provider) => {
                format!("{} API rate limit exceeded.", provider)
            }
            AppError::DatabaseError(_) => "A database error occurred".to_string(),
            AppError::InternalError(_) => "An internal server error occurred".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let first = errors.field_errors().into_iter().next().map(|(field, errs)| {
            let message = errs
                .first()
                .and_then(|e| e.message.as_ref())
                .map(|m| m.to_string())
                .unwrap_or_else(|| "is invalid".to_string());
            (field.to_string(), message)
        });

        match first {
            Some((field, message)) => AppError::Validation {
                message: format!("{} {}", field, message),
                field,
            },
            None => AppError::ValidationError(errors.to_string()),
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, field) = match &self {
            AppError::Validation { field, .. } => ("VALIDATION_ERROR", Some(field.clone())),
            AppError::ValidationError(_) => ("VALIDATION_ERROR", None),
            AppError::NotFound(_) => ("NOT_FOUND", None),
            AppError::LocationNotFound(_) => ("LOCATION_NOT_FOUND", None),
            AppError::NoForecast(_) => ("FORECAST_UNAVAILABLE", None),
            AppError::ProviderUnauthorized(_) => ("PROVIDER_UNAUTHORIZED", None),
            AppError::ProviderRateLimited(_) => ("PROVIDER_RATE_LIMITED", None),
            AppError::ExternalService(_) => ("EXTERNAL_SERVICE_ERROR", None),
            AppError::ProviderUnreachable(_) => ("PROVIDER_UNREACHABLE", None),
            AppError::DatabaseError(_) => ("DATABASE_ERROR", None),
            AppError::Internal(_) | AppError::InternalError(_) => ("INTERNAL_ERROR", None),
        };

        let message = match &self {
            AppError::NotFound(resource) => format!("{} not found", resource),
            AppError::NoForecast(date) => format!("No forecast available for event date {}.", date),
            AppError::Validation { message, .. } => message.clone(),
            AppError::ValidationError(msg) | AppError::Internal(msg) => msg.clone(),
            other => other.detail(),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                field,
            },
        };
        (self.status_code(), Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::NotFound("Event".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::LocationNotFound("Atlantis".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::NoForecast(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::ProviderUnauthorized("OpenWeatherMap").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::ProviderRateLimited("Google Places").status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            AppError::ExternalService("boom".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::ProviderUnreachable("timeout".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_provider_detail_text() {
        assert_eq!(
            AppError::ProviderUnauthorized("OpenWeatherMap").detail(),
            "Invalid OpenWeatherMap API key."
        );
        assert_eq!(
            AppError::ProviderRateLimited("Google Places").detail(),
            "Google Places API rate limit exceeded."
        );
    }

    #[test]
    fn test_response_status() {
        let response = AppError::ValidationError("bad date".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_response_body() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let response = AppError::NoForecast(date).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes =
            tokio_test::block_on(axum::body::to_bytes(response.into_body(), usize::MAX)).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["error"]["code"], "FORECAST_UNAVAILABLE");
        assert_eq!(
            json["error"]["message"],
            "No forecast available for event date 2024-06-01."
        );
        assert!(json["error"].get("field").is_none());
    }

    #[test]
    fn test_from_validation_errors() {
        use validator::Validate;

        let input = shared::EventInput {
            name: " ".to_string(),
            event_type: "sports".to_string(),
            location: "Miami".to_string(),
            event_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        };
        let err: AppError = input.validate().unwrap_err().into();
        match err {
            AppError::Validation { field, message } => {
                assert_eq!(field, "name");
                assert_eq!(message, "name must not be empty");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
