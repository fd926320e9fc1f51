//! Weather service with per-region caching and static fallback
//!
//! Lookups never fail once a region is resolved: provider errors are logged and
//! replaced by the region's static data.

use std::{collections::HashMap, time::Duration};

use chrono::{Local, NaiveDate, Utc};
use shared::{CurrentConditions, ForecastDay, Region, WeatherSnapshot, WeatherState};
use tokio::sync::RwLock;

use crate::config::WeatherConfig;
use crate::error::{AppError, AppResult};
use crate::external::WeatherClient;

type States = RwLock<HashMap<Region, WeatherState>>;

/// Puts a region back in its pre-refresh state if the refresh future is
/// dropped before it settles
struct LoadingRollback<'a> {
    states: &'a States,
    region: Region,
    previous: Option<WeatherState>,
}

impl LoadingRollback<'_> {
    fn disarm(&mut self) {
        self.previous = None;
    }
}

impl Drop for LoadingRollback<'_> {
    fn drop(&mut self) {
        let Some(previous) = self.previous.take() else {
            return;
        };
        match self.states.try_write() {
            Ok(mut states) => {
                if states.get(&self.region).is_some_and(WeatherState::is_loading) {
                    states.insert(self.region, previous);
                    tracing::debug!("Weather refresh for {} cancelled", self.region.key());
                }
            }
            Err(_) => {
                tracing::warn!(
                    "Weather refresh for {} cancelled while the cache was busy",
                    self.region.key()
                );
            }
        }
    }
}

/// Weather service for the dashboard's regions
pub struct WeatherService {
    weather_client: Option<WeatherClient>,
    states: States,
}

impl WeatherService {
    /// Create a WeatherService. Without a client every lookup serves static data.
    pub fn new(weather_client: Option<WeatherClient>) -> Self {
        Self {
            weather_client,
            states: RwLock::new(HashMap::new()),
        }
    }

    /// Build the service from configuration
    pub fn from_config(config: &WeatherConfig) -> AppResult<Self> {
        let weather_client = match config.api_key() {
            Some(key) => Some(WeatherClient::with_timeout(
                key.to_string(),
                config.api_endpoint.clone(),
                Duration::from_secs(config.request_timeout_secs),
            )?),
            None => {
                tracing::warn!("Weather API key not configured, serving static weather data");
                None
            }
        };
        Ok(Self::new(weather_client))
    }

    pub fn is_configured(&self) -> bool {
        self.weather_client.is_some()
    }

    /// Parse a region key
    pub fn resolve(key: &str) -> AppResult<Region> {
        Ok(key.parse::<Region>()?)
    }

    fn client(&self) -> AppResult<&WeatherClient> {
        self.weather_client
            .as_ref()
            .ok_or(AppError::WeatherNotConfigured)
    }

    /// Current conditions for a region, or its static conditions on any error
    pub async fn fetch_current(&self, region: Region) -> CurrentConditions {
        self.current_or_fallback(region).await.0
    }

    /// Daily forecast for a region, or its static forecast on any error
    pub async fn fetch_forecast(&self, region: Region, today: NaiveDate) -> Vec<ForecastDay> {
        self.forecast_or_fallback(region, today).await.0
    }

    async fn current_or_fallback(&self, region: Region) -> (CurrentConditions, bool) {
        let result = match self.client() {
            Ok(client) => client.get_current_weather(&region.coordinates()).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(current) => (current, true),
            Err(e) => {
                tracing::warn!("Current weather for {} unavailable: {}", region.key(), e);
                (region.fallback_current(), false)
            }
        }
    }

    async fn forecast_or_fallback(
        &self,
        region: Region,
        today: NaiveDate,
    ) -> (Vec<ForecastDay>, bool) {
        let result = match self.client() {
            Ok(client) => client.get_forecast(&region.coordinates()).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(forecast) if !forecast.is_empty() => (forecast, true),
            Ok(_) => {
                tracing::warn!("Forecast for {} came back empty", region.key());
                (region.fallback_forecast(today), false)
            }
            Err(e) => {
                tracing::warn!("Forecast for {} unavailable: {}", region.key(), e);
                (region.fallback_forecast(today), false)
            }
        }
    }

    /// Refresh a region using the local date for fallback labels
    pub async fn refresh(&self, region: Region) -> WeatherSnapshot {
        self.refresh_at(region, Local::now().date_naive()).await
    }

    /// Refresh a region: enter `Loading`, fetch both parts concurrently, then
    /// settle into `Fresh` or `Fallback`.
    ///
    /// Concurrent refreshes of one region are not serialized; whichever
    /// finishes last overwrites the cache entry. Dropping the future before it
    /// settles restores the state the region had before.
    pub async fn refresh_at(&self, region: Region, today: NaiveDate) -> WeatherSnapshot {
        let previous = {
            let mut states = self.states.write().await;
            let state = states.entry(region).or_default();
            let loading = state.begin_loading();
            std::mem::replace(state, loading)
        };
        let mut rollback = LoadingRollback {
            states: &self.states,
            region,
            previous: Some(previous),
        };

        let ((current, current_live), (forecast, forecast_live)) = tokio::join!(
            self.current_or_fallback(region),
            self.forecast_or_fallback(region, today)
        );

        let snapshot = WeatherSnapshot {
            region,
            location: region.display_name().to_string(),
            current,
            forecast,
            fetched_at: (current_live && forecast_live).then(Utc::now),
        };

        tracing::info!(
            "Weather for {} refreshed ({})",
            region.key(),
            if snapshot.is_live() { "live" } else { "fallback" }
        );

        self.states
            .write()
            .await
            .insert(region, WeatherState::settled(snapshot.clone()));
        rollback.disarm();

        snapshot
    }

    /// Resolve a region key and refresh it
    pub async fn lookup(&self, key: &str) -> AppResult<WeatherSnapshot> {
        let region = Self::resolve(key)?;
        Ok(self.refresh(region).await)
    }

    /// Last snapshot shown for a region, including while a refresh is in flight
    pub async fn cached(&self, region: Region) -> Option<WeatherSnapshot> {
        self.states
            .read()
            .await
            .get(&region)
            .and_then(|state| state.snapshot().cloned())
    }

    pub async fn state(&self, region: Region) -> WeatherState {
        self.states
            .read()
            .await
            .get(&region)
            .cloned()
            .unwrap_or_default()
    }
}
