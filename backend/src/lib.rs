//! Farm Dashboard - application core
//!
//! Owns the in-memory farm store and the weather lookup service. The derived
//! views themselves live in the `shared` crate and run over store snapshots.

use std::sync::Arc;

use chrono::NaiveDate;
use shared::{DashboardSummary, Region, StoreSnapshot};
use tokio::sync::RwLock;

pub mod config;
pub mod error;
pub mod external;
pub mod services;

pub use config::Config;
pub use error::{AppError, AppResult};
use services::{FarmStore, WeatherRefresher, WeatherService};

/// Application state shared across the dashboard
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<FarmStore>>,
    pub weather: Arc<WeatherService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, store: FarmStore) -> AppResult<Self> {
        let weather = WeatherService::from_config(&config.weather)?;
        Ok(Self {
            store: Arc::new(RwLock::new(store)),
            weather: Arc::new(weather),
            config: Arc::new(config),
        })
    }

    pub async fn snapshot(&self) -> StoreSnapshot {
        self.store.read().await.snapshot()
    }

    pub async fn summary(&self, today: NaiveDate) -> DashboardSummary {
        shared::dashboard_summary(&self.snapshot().await, today)
    }

    /// Refresher for the configured default region
    pub fn refresher(&self) -> AppResult<WeatherRefresher> {
        let region: Region = WeatherService::resolve(&self.config.weather.default_region)?;
        Ok(WeatherRefresher::new(self.weather.clone(), region))
    }
}
