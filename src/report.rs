use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::cache::TtlCache;
use crate::error::{AppError, LookupFailure};
use crate::forecast::{
    openweather::OpenWeatherClient,
    summary::{aggregate_forecast, daily_summaries, pm25_level, DailySummary},
    types::{ForecastSample, PollutionSample},
};
use crate::scoring::{calculate_travel_readiness, round_to_one_decimal, ReadinessWeights, TempType, TravelConditions};
use crate::upstream::Endpoint;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    pub city: String,
    pub temperature: f64,
    pub icon: String,
    pub temp_type: TempType,
    pub feels_like: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub condition: String,
    pub packing: String,
    pub travel_readiness_score: u8,
    pub pm25_level: f64,
    pub daily_summaries: Vec<DailySummary>,
    pub weather_description: String,
}

fn packing_advice(has_rain: bool) -> &'static str {
    if has_rain {
        "Bring an umbrella"
    } else {
        "No umbrella needed"
    }
}

/// Builds travel reports from the current weather, the 3-hour forecast and
/// the air pollution forecast, memoized per lowercase city name.
pub struct WeatherAggregator {
    client: Arc<OpenWeatherClient>,
    cache: TtlCache<WeatherReport>,
    timezone: Tz,
    weights: ReadinessWeights,
}

impl WeatherAggregator {
    pub fn new(client: Arc<OpenWeatherClient>, cache: TtlCache<WeatherReport>, timezone: Tz) -> Self {
        Self {
            client,
            cache,
            timezone,
            weights: ReadinessWeights::default(),
        }
    }

    #[instrument(skip(self))]
    pub async fn get_report(&self, city: &str) -> Result<WeatherReport, AppError> {
        let key = city.to_lowercase();

        if let Some(report) = self.cache.lookup(&key).await {
            debug!("Weather cache hit for {}", key);
            return Ok(report);
        }
        debug!("Weather cache miss for {}", key);

        self.cache
            .get_or_try_insert_with(key, self.build_report(city))
            .await
            .map_err(|failure| {
                warn!("Weather report for {} failed at {}: {}", city, failure.endpoint(), failure);
                AppError::CityNotFound(failure)
            })
    }

    async fn build_report(&self, city: &str) -> Result<WeatherReport, LookupFailure> {
        let current = self.client.get_current_weather(city).await?;
        let coord = current.coord;
        let condition = current.weather.first().ok_or(LookupFailure::MissingField {
            field: "weather[0]",
            endpoint: Endpoint::CurrentWeather,
        })?;

        let (forecast, pollution) = tokio::try_join!(
            self.client.get_forecast3h(city),
            self.client.get_air_pollution(coord),
        )?;

        let samples = forecast
            .list
            .iter()
            .map(ForecastSample::from_forecast3h_item)
            .collect::<Option<Vec<_>>>()
            .ok_or(LookupFailure::MissingField {
                field: "list[].weather[0]",
                endpoint: Endpoint::Forecast,
            })?;
        let pollution_samples: Vec<PollutionSample> =
            pollution.list.iter().map(PollutionSample::from).collect();

        let aggregates = aggregate_forecast(&samples).ok_or(LookupFailure::MissingField {
            field: "list",
            endpoint: Endpoint::Forecast,
        })?;
        let pm25 = pm25_level(&pollution_samples).ok_or(LookupFailure::MissingField {
            field: "list",
            endpoint: Endpoint::AirPollution,
        })?;

        let travel_readiness_score = calculate_travel_readiness(
            &TravelConditions {
                avg_temp: aggregates.avg_temp,
                has_rain: aggregates.has_rain,
                pm25,
                avg_humidity: aggregates.avg_humidity,
                avg_wind_speed: aggregates.avg_wind_speed,
            },
            &self.weights,
        );

        let report = WeatherReport {
            city: city.to_string(),
            temperature: round_to_one_decimal(current.main.temp),
            icon: condition.icon.clone(),
            temp_type: TempType::classify(aggregates.avg_temp),
            feels_like: round_to_one_decimal(current.main.feels_like),
            humidity: round_to_one_decimal(current.main.humidity),
            wind_speed: round_to_one_decimal(current.wind.speed),
            condition: condition.main.clone(),
            packing: packing_advice(aggregates.has_rain).to_string(),
            travel_readiness_score,
            pm25_level: pm25,
            daily_summaries: daily_summaries(&samples, &self.timezone),
            weather_description: condition.description.clone(),
        };

        info!(
            "Built report for {} ({}): score {}, {} days, avg {}°C",
            city,
            current.name.as_deref().unwrap_or("unnamed"),
            report.travel_readiness_score,
            report.daily_summaries.len(),
            aggregates.avg_temp
        );

        Ok(report)
    }
}
