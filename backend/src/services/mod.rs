//! Business logic services for the farm dashboard

pub mod refresh;
pub mod store;
pub mod weather;

pub use refresh::{RefreshHandle, WeatherRefresher};
pub use store::FarmStore;
pub use weather::WeatherService;
