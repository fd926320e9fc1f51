//! Weather API client for fetching weather data
//!
//! Integrates with the OpenWeatherMap API for current conditions and the
//! 5-day / 3-hour forecast. Units are imperial (°F, mph).

use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use reqwest::Client;
use serde::Deserialize;
use shared::{
    forecast_day_label, CurrentConditions, ForecastDay, GpsCoordinates, WeatherIcon,
    FORECAST_DAYS,
};

use crate::error::{AppError, AppResult};

/// Weather API client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
}

/// OpenWeatherMap API response for current weather
#[derive(Debug, Deserialize)]
struct OWMCurrentResponse {
    #[serde(default)]
    weather: Vec<OWMWeather>,
    main: OWMMain,
    #[serde(default)]
    wind: OWMWind,
}

#[derive(Debug, Deserialize)]
struct OWMWeather {
    main: String,
}

#[derive(Debug, Deserialize)]
struct OWMMain {
    temp: f64,
    #[serde(default)]
    temp_min: Option<f64>,
    #[serde(default)]
    temp_max: Option<f64>,
    #[serde(default)]
    humidity: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OWMWind {
    #[serde(default)]
    speed: f64,
}

/// OpenWeatherMap API response for forecast
#[derive(Debug, Deserialize)]
struct OWMForecastResponse {
    #[serde(default)]
    city: Option<OWMCity>,
    list: Vec<OWMForecastItem>,
}

#[derive(Debug, Deserialize)]
struct OWMCity {
    /// Offset from UTC in seconds
    #[serde(default)]
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct OWMForecastItem {
    dt: i64,
    main: OWMMain,
    #[serde(default)]
    weather: Vec<OWMWeather>,
}

/// One 3-hour forecast reading, reduced to what the daily strip needs
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastReading {
    pub date: NaiveDate,
    pub high: f64,
    pub low: f64,
    pub condition: String,
}

impl WeatherClient {
    pub const DEFAULT_BASE_URL: &'static str = crate::config::DEFAULT_WEATHER_ENDPOINT;

    /// Create a new WeatherClient
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, Self::DEFAULT_BASE_URL.to_string())
    }

    /// Create a new WeatherClient with custom base URL (for testing)
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create a client whose requests give up after `timeout`
    pub fn with_timeout(api_key: String, base_url: String, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch current weather conditions by GPS coordinates
    pub async fn get_current_weather(
        &self,
        coordinates: &GpsCoordinates,
    ) -> AppResult<CurrentConditions> {
        let data: OWMCurrentResponse = self.get_json("weather", coordinates).await?;
        Ok(convert_current_response(data))
    }

    /// Fetch the daily forecast strip by GPS coordinates
    pub async fn get_forecast(&self, coordinates: &GpsCoordinates) -> AppResult<Vec<ForecastDay>> {
        let data: OWMForecastResponse = self.get_json("forecast", coordinates).await?;
        let offset = data.city.as_ref().map(|c| c.timezone).unwrap_or(0);
        let readings = data
            .list
            .into_iter()
            .filter_map(|item| convert_forecast_item(item, offset))
            .collect::<Vec<_>>();
        Ok(daily_forecast(&readings))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        coordinates: &GpsCoordinates,
    ) -> AppResult<T> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let latitude = coordinates.latitude.to_string();
        let longitude = coordinates.longitude.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", latitude.as_str()),
                ("lon", longitude.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "imperial"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::WeatherProvider(format!("{} - {}", status, body)));
        }

        response.json().await.map_err(|e| {
            AppError::WeatherProvider(format!("Failed to parse {} response: {}", endpoint, e))
        })
    }
}

fn round(value: f64) -> i32 {
    value.round() as i32
}

/// Convert OpenWeatherMap current response to our format
fn convert_current_response(data: OWMCurrentResponse) -> CurrentConditions {
    let condition = data
        .weather
        .first()
        .map(|w| w.main.clone())
        .unwrap_or_default();

    CurrentConditions {
        temperature: round(data.main.temp),
        icon: WeatherIcon::from_condition(&condition),
        condition,
        humidity: data.main.humidity.round().clamp(0.0, 100.0) as u8,
        wind_speed: round(data.wind.speed),
    }
}

fn convert_forecast_item(item: OWMForecastItem, offset_seconds: i32) -> Option<ForecastReading> {
    let offset = FixedOffset::east_opt(offset_seconds)?;
    let date = DateTime::<Utc>::from_timestamp(item.dt, 0)?
        .with_timezone(&offset)
        .date_naive();

    Some(ForecastReading {
        date,
        high: item.main.temp_max.unwrap_or(item.main.temp),
        low: item.main.temp_min.unwrap_or(item.main.temp),
        condition: item
            .weather
            .first()
            .map(|w| w.main.clone())
            .unwrap_or_default(),
    })
}

/// Collapse 3-hour readings into at most five calendar days, in reading order.
///
/// High and low are the extremes over the day; the condition is the day's first
/// reading. Buckets are labeled "Today", "Tomorrow", then by weekday.
pub fn daily_forecast(readings: &[ForecastReading]) -> Vec<ForecastDay> {
    let mut days: Vec<(NaiveDate, f64, f64, &str)> = Vec::new();

    for reading in readings {
        match days.iter_mut().find(|(date, ..)| *date == reading.date) {
            Some((_, high, low, _)) => {
                *high = high.max(reading.high);
                *low = low.min(reading.low);
            }
            None => {
                if days.len() == FORECAST_DAYS {
                    continue;
                }
                days.push((reading.date, reading.high, reading.low, reading.condition.as_str()));
            }
        }
    }

    days.into_iter()
        .enumerate()
        .map(|(index, (date, high, low, condition))| ForecastDay {
            day: forecast_day_label(index, date),
            date,
            high: round(high),
            low: round(low),
            condition: condition.to_string(),
            icon: WeatherIcon::from_condition(condition),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(day: u32, high: f64, low: f64, condition: &str) -> ForecastReading {
        ForecastReading {
            date: NaiveDate::from_ymd_opt(2024, 4, day).unwrap(),
            high,
            low,
            condition: condition.to_string(),
        }
    }

    #[test]
    fn test_convert_current_rounds_and_maps_icon() {
        let data: OWMCurrentResponse = serde_json::from_value(serde_json::json!({
            "weather": [{ "main": "Rain", "description": "light rain", "icon": "10d" }],
            "main": { "temp": 71.6, "humidity": 52 },
            "wind": { "speed": 8.49 },
            "name": "Fresno"
        }))
        .unwrap();

        let current = convert_current_response(data);
        assert_eq!(current.temperature, 72);
        assert_eq!(current.wind_speed, 8);
        assert_eq!(current.humidity, 52);
        assert_eq!(current.condition, "Rain");
        assert_eq!(current.icon, WeatherIcon::CloudRain);
    }

    #[test]
    fn test_daily_forecast_groups_by_date() {
        let readings = vec![
            reading(10, 70.2, 60.0, "Clear"),
            reading(10, 74.6, 58.4, "Clouds"),
            reading(11, 68.0, 50.0, "Rain"),
            reading(11, 69.0, 49.5, "Clear"),
        ];

        let days = daily_forecast(&readings);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].day, "Today");
        assert_eq!(days[0].high, 75);
        assert_eq!(days[0].low, 58);
        assert_eq!(days[0].icon, WeatherIcon::Sun);
        assert_eq!(days[1].day, "Tomorrow");
        assert_eq!(days[1].low, 50);
        assert_eq!(days[1].condition, "Rain");
    }

    #[test]
    fn test_daily_forecast_caps_at_five_days() {
        let readings: Vec<_> = (10..=16).map(|d| reading(d, 70.0, 50.0, "Clouds")).collect();
        let days = daily_forecast(&readings);
        assert_eq!(days.len(), FORECAST_DAYS);
        // 2024-04-12 is a Friday
        assert_eq!(days[2].day, "Fri");
        assert_eq!(days[4].date, NaiveDate::from_ymd_opt(2024, 4, 14).unwrap());
    }

    #[test]
    fn test_forecast_item_uses_city_offset() {
        // 2024-04-10T03:00:00Z is still 2024-04-09 in UTC-7
        let item = OWMForecastItem {
            dt: 1712718000,
            main: OWMMain {
                temp: 60.0,
                temp_min: Some(55.0),
                temp_max: Some(61.0),
                humidity: 40.0,
            },
            weather: vec![],
        };
        let reading = convert_forecast_item(item, -7 * 3600).unwrap();
        assert_eq!(reading.date, NaiveDate::from_ymd_opt(2024, 4, 9).unwrap());
        assert_eq!(reading.condition, "");
    }
}
