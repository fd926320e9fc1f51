//! Farm Dashboard - host process
//!
//! Seeds the in-memory store with demo data and keeps the selected region's
//! weather fresh until interrupted.

use std::{sync::Arc, time::Duration};

use chrono::Local;
use farm_dashboard::{services::FarmStore, AppState, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "farm_dashboard=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Farm Dashboard");
    tracing::info!("Environment: {}", config.environment);

    let today = Local::now().date_naive();
    let interval = Duration::from_secs(config.weather.refresh_interval_secs);
    let state = AppState::new(config, FarmStore::with_sample_data(today))?;

    let summary = state.summary(today).await;
    tracing::info!(
        "Loaded {} farms, {} active crops, {} pending tasks ({} upcoming, {} overdue)",
        summary.total_farms,
        summary.active_crops,
        summary.pending_tasks,
        summary.upcoming_tasks,
        summary.overdue_tasks
    );
    tracing::info!(
        "Expenses {} / revenue {}",
        summary.total_expenses,
        summary.total_revenue
    );

    let refresher = Arc::new(state.refresher()?);
    tracing::info!(
        "Refreshing weather for {} every {}s",
        refresher.region().await,
        interval.as_secs()
    );
    let handle = refresher.spawn(interval)?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");
    handle.shutdown();

    Ok(())
}
