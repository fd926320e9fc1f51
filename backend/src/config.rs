//! Configuration management for the farm dashboard
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with FARM_ prefix

use config::{Environment, File};
use serde::Deserialize;
use shared::Region;

use crate::error::{AppError, AppResult};

pub const DEFAULT_WEATHER_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5";

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Weather API configuration
    pub weather: WeatherConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// Weather API endpoint
    pub api_endpoint: String,

    /// Weather API key; without one every lookup serves static data
    #[serde(default)]
    pub api_key: Option<String>,

    /// Region shown when the dashboard opens
    pub default_region: String,

    /// Seconds between automatic refreshes
    pub refresh_interval_secs: u64,

    /// Per-request timeout for the weather provider
    pub request_timeout_secs: u64,
}

impl WeatherConfig {
    /// Configured key, ignoring blank values from empty env vars
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> AppResult<Self> {
        let environment =
            std::env::var("FARM_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("weather.api_endpoint", DEFAULT_WEATHER_ENDPOINT)?
            .set_default("weather.default_region", "california")?
            .set_default("weather.refresh_interval_secs", 1800)?
            .set_default("weather.request_timeout_secs", 10)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (FARM_ prefix)
            .add_source(
                Environment::with_prefix("FARM")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the weather refresh cannot run with
    pub fn validate(&self) -> AppResult<()> {
        if self.weather.refresh_interval_secs == 0 {
            return Err(AppError::Configuration(
                "weather.refresh_interval_secs must be greater than zero".to_string(),
            ));
        }
        if self.weather.request_timeout_secs == 0 {
            return Err(AppError::Configuration(
                "weather.request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        self.weather.default_region.parse::<Region>()?;
        Ok(())
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_WEATHER_ENDPOINT.to_string(),
            api_key: None,
            default_region: "california".to_string(),
            refresh_interval_secs: 1800,
            request_timeout_secs: 10,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            weather: WeatherConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let mut weather = WeatherConfig::default();
        assert_eq!(weather.api_key(), None);

        weather.api_key = Some("   ".to_string());
        assert_eq!(weather.api_key(), None);

        weather.api_key = Some("abc123".to_string());
        assert_eq!(weather.api_key(), Some("abc123"));
    }

    #[test]
    fn test_zero_refresh_interval_rejected() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.weather.refresh_interval_secs = 0;
        let err = config.validate().unwrap_err();
        assert_eq!(err.code(), "CONFIGURATION_ERROR");
        assert!(err.to_string().contains("refresh_interval_secs"));
    }

    #[test]
    fn test_load_rejects_zero_interval_from_env() {
        std::env::set_var("FARM__WEATHER__REFRESH_INTERVAL_SECS", "0");
        let result = Config::load();
        std::env::remove_var("FARM__WEATHER__REFRESH_INTERVAL_SECS");

        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn test_unknown_default_region_rejected() {
        let mut config = Config::default();
        config.weather.default_region = "oregon".to_string();
        assert!(matches!(
            config.validate(),
            Err(AppError::UnsupportedRegion(ref key)) if key == "oregon"
        ));
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.weather.refresh_interval_secs, 1800);
        assert_eq!(config.weather.default_region, "california");
        assert_eq!(config.weather.api_endpoint, DEFAULT_WEATHER_ENDPOINT);
    }
}
