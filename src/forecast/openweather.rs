use super::types::*;
use crate::config::Config;
use crate::upstream::{Endpoint, UpstreamClient, UpstreamError};

pub struct OpenWeatherClient {
    upstream: UpstreamClient,
    config: Config,
}

impl OpenWeatherClient {
    pub fn new(upstream: UpstreamClient, config: Config) -> Self {
        Self { upstream, config }
    }

    pub async fn get_current_weather(
        &self,
        city: &str,
    ) -> Result<CurrentWeatherResponse, UpstreamError> {
        let url = format!(
            "{}{}",
            self.config.openweather_base_url, self.config.openweather_current_path
        );

        self.upstream
            .fetch(Endpoint::CurrentWeather, &url, &[
                ("q", city),
                ("units", "metric"),
                ("appid", &self.config.openweather_api_key),
            ])
            .await
    }

    pub async fn get_forecast3h(&self, city: &str) -> Result<Forecast3hResponse, UpstreamError> {
        let url = format!(
            "{}{}",
            self.config.openweather_base_url, self.config.openweather_forecast_path
        );

        self.upstream
            .fetch(Endpoint::Forecast, &url, &[
                ("q", city),
                ("units", "metric"),
                ("appid", &self.config.openweather_api_key),
            ])
            .await
    }

    pub async fn get_air_pollution(
        &self,
        coord: Coordinates,
    ) -> Result<AirPollutionResponse, UpstreamError> {
        let url = format!(
            "{}{}",
            self.config.openweather_base_url, self.config.openweather_air_pollution_path
        );

        self.upstream
            .fetch(Endpoint::AirPollution, &url, &[
                ("lat", &coord.lat.to_string()),
                ("lon", &coord.lon.to_string()),
                ("appid", &self.config.openweather_api_key),
            ])
            .await
    }
}
