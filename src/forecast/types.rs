use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

// Current weather (/data/2.5/weather)

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentWeatherResponse {
    pub coord: Coordinates,
    pub weather: Vec<WeatherCondition>,
    pub main: CurrentMain,
    pub wind: Wind,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentMain {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherCondition {
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
}

// 5 day / 3 hour forecast (/data/2.5/forecast)

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast3hResponse {
    pub list: Vec<Forecast3hItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast3hItem {
    pub dt: i64,
    pub main: Forecast3hMain,
    pub weather: Vec<WeatherCondition>,
    pub wind: Wind,
    pub rain: Option<HashMap<String, f64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast3hMain {
    pub temp: f64,
    pub humidity: f64,
}

// Air pollution forecast (/data/2.5/air_pollution/forecast)

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirPollutionResponse {
    pub list: Vec<AirPollutionItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirPollutionItem {
    pub components: AirComponents,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirComponents {
    pub pm2_5: f64,
}

/// One 3-hour step of the forecast, flattened out of the upstream item.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSample {
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub rain_volume: Option<f64>,
    pub condition_main: String,
    pub condition_icon: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollutionSample {
    pub pm25: f64,
}

impl From<&AirPollutionItem> for PollutionSample {
    fn from(item: &AirPollutionItem) -> Self {
        Self {
            pm25: item.components.pm2_5,
        }
    }
}

impl ForecastSample {
    /// `None` when the item has no condition entry or an unrepresentable timestamp.
    pub fn from_forecast3h_item(item: &Forecast3hItem) -> Option<Self> {
        let condition = item.weather.first()?;
        let timestamp = DateTime::from_timestamp(item.dt, 0)?;
        let rain_volume = item.rain.as_ref().and_then(|r| r.get("3h")).copied();

        Some(Self {
            timestamp,
            temperature: item.main.temp,
            humidity: item.main.humidity,
            wind_speed: item.wind.speed,
            rain_volume,
            condition_main: condition.main.clone(),
            condition_icon: condition.icon.clone(),
        })
    }
}
