//! Error handling for the farm dashboard
//!
//! Errors carry a stable code so the presentation layer can show an inline notice.

use serde::Serialize;
use shared::UnsupportedRegion;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Weather errors
    #[error("Unsupported region: {0}")]
    UnsupportedRegion(String),

    #[error("Weather API key is not configured")]
    WeatherNotConfigured,

    #[error("Weather provider error: {0}")]
    WeatherProvider(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Serializable description of an error for display
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AppError {
    /// Validation failure on a named field
    pub fn validation(field: &str, message: &str) -> Self {
        AppError::Validation {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::UnsupportedRegion(_) => "UNSUPPORTED_REGION",
            AppError::WeatherNotConfigured => "WEATHER_NOT_CONFIGURED",
            AppError::WeatherProvider(_) => "WEATHER_PROVIDER_ERROR",
            AppError::Http(_) => "HTTP_ERROR",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }

    pub fn detail(&self) -> ErrorDetail {
        let field = match self {
            AppError::Validation { field, .. } => Some(field.clone()),
            _ => None,
        };
        let message = match self {
            AppError::Validation { message, .. } => message.clone(),
            AppError::NotFound(resource) => format!("{} not found", resource),
            other => other.to_string(),
        };
        ErrorDetail {
            code: self.code(),
            message,
            field,
        }
    }
}

impl From<UnsupportedRegion> for AppError {
    fn from(err: UnsupportedRegion) -> Self {
        AppError::UnsupportedRegion(err.0)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

/// Result type alias for services
pub type AppResult<T> = Result<T, AppError>;
