use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    pub openweather_api_key: String,
    pub openweather_base_url: String,
    pub openweather_current_path: String,
    pub openweather_forecast_path: String,
    pub openweather_air_pollution_path: String,
    pub google_api_key: String,
    pub google_maps_base_url: String,
    pub place_search_path: String,
    pub place_photo_path: String,
    pub place_photo_max_width: u32,
    pub app_timezone: String,
    pub cache_ttl_ms: u64,
    pub bind_addr: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Config {
            openweather_api_key: env::var("WEATHER_API_KEY")
                .map_err(|_| anyhow::anyhow!("WEATHER_API_KEY not set"))?,
            openweather_base_url: env::var("OPENWEATHER_BASE_URL")
                .unwrap_or_else(|_| "http://api.openweathermap.org".to_string()),
            openweather_current_path: env::var("OPENWEATHER_CURRENT_PATH")
                .unwrap_or_else(|_| "/data/2.5/weather".to_string()),
            openweather_forecast_path: env::var("OPENWEATHER_FORECAST_PATH")
                .unwrap_or_else(|_| "/data/2.5/forecast".to_string()),
            openweather_air_pollution_path: env::var("OPENWEATHER_AIR_POLLUTION_PATH")
                .unwrap_or_else(|_| "/data/2.5/air_pollution/forecast".to_string()),
            google_api_key: env::var("GOOGLE_API_KEY")
                .map_err(|_| anyhow::anyhow!("GOOGLE_API_KEY not set"))?,
            google_maps_base_url: env::var("GOOGLE_MAPS_BASE_URL")
                .unwrap_or_else(|_| "https://maps.googleapis.com".to_string()),
            place_search_path: env::var("PLACE_SEARCH_PATH")
                .unwrap_or_else(|_| "/maps/api/place/findplacefromtext/json".to_string()),
            place_photo_path: env::var("PLACE_PHOTO_PATH")
                .unwrap_or_else(|_| "/maps/api/place/photo".to_string()),
            place_photo_max_width: parse_env("PLACE_PHOTO_MAX_WIDTH", 800)?,
            app_timezone: env::var("APP_TIMEZONE").unwrap_or_else(|_| "UTC".to_string()),
            cache_ttl_ms: parse_env("CACHE_TTL_MS", 60_000)?,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
        })
    }

    /// Time zone used to bucket forecast samples into calendar days.
    pub fn timezone(&self) -> anyhow::Result<chrono_tz::Tz> {
        self.app_timezone
            .parse::<chrono_tz::Tz>()
            .map_err(|_| anyhow::anyhow!("Invalid APP_TIMEZONE: {}", self.app_timezone))
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> anyhow::Result<T> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} is not a valid number: {}", key, raw)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Points both upstream providers at a single mock server.
    pub fn for_base_url(base_url: &str) -> Self {
        Config {
            openweather_api_key: "weather-key".to_string(),
            openweather_base_url: base_url.to_string(),
            openweather_current_path: "/data/2.5/weather".to_string(),
            openweather_forecast_path: "/data/2.5/forecast".to_string(),
            openweather_air_pollution_path: "/data/2.5/air_pollution/forecast".to_string(),
            google_api_key: "google-key".to_string(),
            google_maps_base_url: base_url.to_string(),
            place_search_path: "/maps/api/place/findplacefromtext/json".to_string(),
            place_photo_path: "/maps/api/place/photo".to_string(),
            place_photo_max_width: 800,
            app_timezone: "UTC".to_string(),
            cache_ttl_ms: 60_000,
            bind_addr: "127.0.0.1:0".to_string(),
        }
    }
}
