//! Weather data models
//!
//! Regions are a closed set of farm belts. Each carries coordinates for the live
//! provider and a hard-coded snapshot used whenever the provider cannot answer.

use chrono::{DateTime, Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::GpsCoordinates;

/// Number of days shown in a forecast strip
pub const FORECAST_DAYS: usize = 5;

/// Supported farm regions for weather lookups
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    #[default]
    California,
    Iowa,
    Kansas,
    Texas,
    Nebraska,
}

/// Returned when a region key is not one of the supported farm belts
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported region: {0}")]
pub struct UnsupportedRegion(pub String);

impl Region {
    pub const ALL: [Region; 5] = [
        Region::California,
        Region::Iowa,
        Region::Kansas,
        Region::Texas,
        Region::Nebraska,
    ];

    /// Short lookup key, e.g. "california"
    pub fn key(&self) -> &'static str {
        match self {
            Region::California => "california",
            Region::Iowa => "iowa",
            Region::Kansas => "kansas",
            Region::Texas => "texas",
            Region::Nebraska => "nebraska",
        }
    }

    /// Human-readable name of the farm belt
    pub fn display_name(&self) -> &'static str {
        match self {
            Region::California => "California Central Valley",
            Region::Iowa => "Iowa Corn Belt",
            Region::Kansas => "Kansas Wheat Belt",
            Region::Texas => "Texas Panhandle",
            Region::Nebraska => "Nebraska Plains",
        }
    }

    /// Representative coordinates used for provider queries
    pub fn coordinates(&self) -> GpsCoordinates {
        let (lat, lon) = match self {
            Region::California => (Decimal::new(367378, 4), Decimal::new(-1197871, 4)),
            Region::Iowa => (Decimal::new(420308, 4), Decimal::new(-936319, 4)),
            Region::Kansas => (Decimal::new(388403, 4), Decimal::new(-976114, 4)),
            Region::Texas => (Decimal::new(352220, 4), Decimal::new(-1018313, 4)),
            Region::Nebraska => (Decimal::new(411403, 4), Decimal::new(-1007601, 4)),
        };
        GpsCoordinates::new(lat, lon)
    }

    /// Static current conditions shown when the provider is unavailable
    pub fn fallback_current(&self) -> CurrentConditions {
        let (temperature, condition, humidity, wind_speed) = match self {
            Region::California => (72, "Sunny", 45, 8),
            Region::Iowa => (65, "Partly Cloudy", 60, 12),
            Region::Kansas => (70, "Clear", 35, 15),
            Region::Texas => (78, "Hot", 40, 10),
            Region::Nebraska => (63, "Breezy", 55, 18),
        };
        CurrentConditions::new(temperature, condition, humidity, wind_speed)
    }

    /// Static five-day forecast, labeled relative to `today`
    pub fn fallback_forecast(&self, today: NaiveDate) -> Vec<ForecastDay> {
        let days: [(i32, i32, &str); FORECAST_DAYS] = match self {
            Region::California => [
                (75, 55, "Sunny"),
                (78, 58, "Partly Cloudy"),
                (76, 60, "Cloudy"),
                (73, 57, "Light Rain"),
                (71, 54, "Sunny"),
            ],
            Region::Iowa => [
                (68, 48, "Partly Cloudy"),
                (71, 52, "Sunny"),
                (74, 55, "Thunderstorms"),
                (69, 51, "Cloudy"),
                (72, 54, "Sunny"),
            ],
            Region::Kansas => [
                (74, 52, "Clear"),
                (77, 55, "Sunny"),
                (79, 58, "Partly Cloudy"),
                (75, 54, "Windy"),
                (73, 51, "Clear"),
            ],
            Region::Texas => [
                (82, 62, "Hot"),
                (85, 65, "Sunny"),
                (83, 63, "Partly Cloudy"),
                (81, 61, "Thunderstorms"),
                (79, 59, "Cloudy"),
            ],
            Region::Nebraska => [
                (67, 45, "Breezy"),
                (70, 48, "Partly Cloudy"),
                (72, 51, "Sunny"),
                (69, 49, "Light Rain"),
                (66, 46, "Cloudy"),
            ],
        };

        days.iter()
            .enumerate()
            .map(|(offset, (high, low, condition))| {
                let date = today
                    .checked_add_days(Days::new(offset as u64))
                    .unwrap_or(today);
                ForecastDay {
                    day: forecast_day_label(offset, date),
                    date,
                    high: *high,
                    low: *low,
                    condition: condition.to_string(),
                    icon: WeatherIcon::from_condition(condition),
                }
            })
            .collect()
    }

    /// Snapshot made entirely of static data
    pub fn fallback_snapshot(&self, today: NaiveDate) -> WeatherSnapshot {
        WeatherSnapshot {
            region: *self,
            location: self.display_name().to_string(),
            current: self.fallback_current(),
            forecast: self.fallback_forecast(today),
            fetched_at: None,
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for Region {
    type Err = UnsupportedRegion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Self::ALL
            .into_iter()
            .find(|region| region.key().eq_ignore_ascii_case(key))
            .ok_or_else(|| UnsupportedRegion(key.to_string()))
    }
}

/// Label for the n-th day of a forecast strip: "Today", "Tomorrow", then "Mon", "Tue", ...
pub fn forecast_day_label(offset: usize, date: NaiveDate) -> String {
    match offset {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => date.format("%a").to_string(),
    }
}

/// Icon vocabulary understood by the dashboard
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum WeatherIcon {
    Sun,
    #[default]
    Cloud,
    CloudRain,
}

impl WeatherIcon {
    /// Map a condition string to an icon. Unrecognized conditions show a cloud.
    ///
    /// Accepts both provider groups ("Clear", "Rain") and the descriptive
    /// labels used by the static data ("Light Rain", "Hot").
    pub fn from_condition(condition: &str) -> Self {
        let condition = condition.trim().to_ascii_lowercase();
        if condition.contains("rain")
            || condition.contains("drizzle")
            || condition.contains("thunder")
        {
            WeatherIcon::CloudRain
        } else if matches!(condition.as_str(), "clear" | "sunny" | "hot") {
            WeatherIcon::Sun
        } else {
            WeatherIcon::Cloud
        }
    }
}

impl std::fmt::Display for WeatherIcon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeatherIcon::Sun => write!(f, "Sun"),
            WeatherIcon::Cloud => write!(f, "Cloud"),
            WeatherIcon::CloudRain => write!(f, "CloudRain"),
        }
    }
}

/// Current conditions, temperatures in °F and wind in mph
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrentConditions {
    pub temperature: i32,
    pub condition: String,
    pub humidity: u8,
    pub wind_speed: i32,
    pub icon: WeatherIcon,
}

impl CurrentConditions {
    pub fn new(temperature: i32, condition: &str, humidity: u8, wind_speed: i32) -> Self {
        Self {
            temperature,
            condition: condition.to_string(),
            humidity,
            wind_speed,
            icon: WeatherIcon::from_condition(condition),
        }
    }
}

/// One day of a forecast strip
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ForecastDay {
    pub day: String,
    pub date: NaiveDate,
    pub high: i32,
    pub low: i32,
    pub condition: String,
    pub icon: WeatherIcon,
}

/// Weather for one region as shown on the dashboard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherSnapshot {
    pub region: Region,
    pub location: String,
    pub current: CurrentConditions,
    pub forecast: Vec<ForecastDay>,
    /// Set only when every part came from the live provider
    pub fetched_at: Option<DateTime<Utc>>,
}

impl WeatherSnapshot {
    pub fn is_live(&self) -> bool {
        self.fetched_at.is_some()
    }
}

/// Lifecycle of a region's weather
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum WeatherState {
    #[default]
    Unfetched,
    /// A refresh is in flight; the last snapshot stays visible meanwhile
    Loading { previous: Option<WeatherSnapshot> },
    Fresh { snapshot: WeatherSnapshot },
    Fallback { snapshot: WeatherSnapshot },
}

impl WeatherState {
    /// Terminal state for a finished refresh
    pub fn settled(snapshot: WeatherSnapshot) -> Self {
        if snapshot.is_live() {
            WeatherState::Fresh { snapshot }
        } else {
            WeatherState::Fallback { snapshot }
        }
    }

    /// Enter `Loading`, carrying whatever was displayed before
    pub fn begin_loading(&self) -> Self {
        WeatherState::Loading {
            previous: self.snapshot().cloned(),
        }
    }

    /// Snapshot to display in this state, if any
    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        match self {
            WeatherState::Unfetched => None,
            WeatherState::Loading { previous } => previous.as_ref(),
            WeatherState::Fresh { snapshot } | WeatherState::Fallback { snapshot } => {
                Some(snapshot)
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, WeatherState::Loading { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_region_parse_is_case_insensitive() {
        assert_eq!("california".parse::<Region>(), Ok(Region::California));
        assert_eq!(" Iowa ".parse::<Region>(), Ok(Region::Iowa));
        assert_eq!("NEBRASKA".parse::<Region>(), Ok(Region::Nebraska));
    }

    #[test]
    fn test_unknown_region_is_rejected() {
        let err = "oregon".parse::<Region>().unwrap_err();
        assert_eq!(err, UnsupportedRegion("oregon".to_string()));
    }

    #[test]
    fn test_icon_mapping() {
        assert_eq!(WeatherIcon::from_condition("Clear"), WeatherIcon::Sun);
        assert_eq!(WeatherIcon::from_condition("Sunny"), WeatherIcon::Sun);
        assert_eq!(WeatherIcon::from_condition("Rain"), WeatherIcon::CloudRain);
        assert_eq!(WeatherIcon::from_condition("Drizzle"), WeatherIcon::CloudRain);
        assert_eq!(WeatherIcon::from_condition("Thunderstorm"), WeatherIcon::CloudRain);
        assert_eq!(WeatherIcon::from_condition("Light Rain"), WeatherIcon::CloudRain);
        assert_eq!(WeatherIcon::from_condition("Clouds"), WeatherIcon::Cloud);
        assert_eq!(WeatherIcon::from_condition("Mist"), WeatherIcon::Cloud);
        assert_eq!(WeatherIcon::from_condition(""), WeatherIcon::Cloud);
    }

    #[test]
    fn test_fallback_icons_match_static_table() {
        let current = Region::Iowa.fallback_current();
        assert_eq!(current.temperature, 65);
        assert_eq!(current.icon, WeatherIcon::Cloud);

        let forecast = Region::Texas.fallback_forecast(date(2024, 4, 10));
        let icons: Vec<_> = forecast.iter().map(|d| d.icon).collect();
        assert_eq!(
            icons,
            vec![
                WeatherIcon::Sun,
                WeatherIcon::Sun,
                WeatherIcon::Cloud,
                WeatherIcon::CloudRain,
                WeatherIcon::Cloud,
            ]
        );
    }

    #[test]
    fn test_fallback_forecast_labels() {
        // 2024-04-10 is a Wednesday
        let forecast = Region::California.fallback_forecast(date(2024, 4, 10));
        let labels: Vec<_> = forecast.iter().map(|d| d.day.as_str()).collect();
        assert_eq!(labels, vec!["Today", "Tomorrow", "Fri", "Sat", "Sun"]);
        assert_eq!(forecast[4].date, date(2024, 4, 14));
    }

    #[test]
    fn test_weather_state_transitions() {
        let snapshot = Region::Kansas.fallback_snapshot(date(2024, 4, 10));
        let state = WeatherState::settled(snapshot.clone());
        assert!(matches!(state, WeatherState::Fallback { .. }));

        let loading = state.begin_loading();
        assert!(loading.is_loading());
        assert_eq!(loading.snapshot(), Some(&snapshot));

        let mut live = snapshot;
        live.fetched_at = Some(Utc::now());
        assert!(matches!(WeatherState::settled(live), WeatherState::Fresh { .. }));
        assert!(WeatherState::Unfetched.begin_loading().snapshot().is_none());
    }
}
