//! Periodic weather refresh for the selected region

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use shared::{Region, WeatherSnapshot};
use tokio::{sync::RwLock, task::JoinHandle, time::MissedTickBehavior};

use crate::error::{AppError, AppResult};
use crate::services::WeatherService;

/// Clears the loading flag even if the refresh future is dropped mid-flight
struct LoadingGuard<'a>(&'a AtomicBool);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Refreshes the selected region on demand and on a timer
pub struct WeatherRefresher {
    weather: Arc<WeatherService>,
    region: RwLock<Region>,
    loading: AtomicBool,
}

impl WeatherRefresher {
    pub fn new(weather: Arc<WeatherService>, region: Region) -> Self {
        Self {
            weather,
            region: RwLock::new(region),
            loading: AtomicBool::new(false),
        }
    }

    pub async fn region(&self) -> Region {
        *self.region.read().await
    }

    /// Switch the selected region. The next refresh uses it.
    pub async fn select_region(&self, key: &str) -> AppResult<Region> {
        let region = WeatherService::resolve(key)?;
        *self.region.write().await = region;
        tracing::info!("Selected weather region {}", region.key());
        Ok(region)
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// Refresh the selected region, or return `None` if a refresh is already running
    pub async fn refresh_now(&self) -> Option<WeatherSnapshot> {
        if self.loading.swap(true, Ordering::AcqRel) {
            tracing::debug!("Weather refresh already in flight, skipping");
            return None;
        }
        let _guard = LoadingGuard(&self.loading);

        let region = self.region().await;
        Some(self.weather.refresh(region).await)
    }

    /// Refresh immediately, then once per `interval` until the handle is shut down.
    /// A zero interval is rejected.
    pub fn spawn(self: Arc<Self>, interval: Duration) -> AppResult<RefreshHandle> {
        if interval.is_zero() {
            return Err(AppError::Configuration(
                "Refresh interval must be greater than zero".to_string(),
            ));
        }
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                self.refresh_now().await;
            }
        });
        Ok(RefreshHandle { task })
    }
}

/// Owns the background refresh task. Dropping the handle cancels it.
pub struct RefreshHandle {
    task: JoinHandle<()>,
}

impl RefreshHandle {
    /// Stop the refresh loop, abandoning any request in flight
    pub fn shutdown(self) {
        self.task.abort();
        tracing::info!("Weather refresh stopped");
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
