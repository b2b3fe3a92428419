use super::types::{ForecastSample, PollutionSample};
use crate::scoring::round_to_one_decimal;
use chrono::TimeZone;
use serde::{Deserialize, Serialize};

/// Near-term horizon for the air quality figure: 20 steps of 3 hours.
pub const PM25_SAMPLE_LIMIT: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastAggregates {
    pub has_rain: bool,
    pub avg_temp: f64,
    pub avg_humidity: f64,
    pub avg_wind_speed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub date: String,
    pub avg_temp: f64,
    pub avg_wind_speed: f64,
    pub total_rain: f64,
    pub icon: String,
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    sum / count as f64
}

/// Averages over every sample, rounded to one decimal. `None` for an empty forecast.
pub fn aggregate_forecast(samples: &[ForecastSample]) -> Option<ForecastAggregates> {
    if samples.is_empty() {
        return None;
    }

    Some(ForecastAggregates {
        has_rain: samples.iter().any(|s| s.condition_main == "Rain"),
        avg_temp: round_to_one_decimal(mean(samples.iter().map(|s| s.temperature))),
        avg_humidity: round_to_one_decimal(mean(samples.iter().map(|s| s.humidity))),
        avg_wind_speed: round_to_one_decimal(mean(samples.iter().map(|s| s.wind_speed))),
    })
}

/// Mean pm2.5 over the first [`PM25_SAMPLE_LIMIT`] samples only.
pub fn pm25_level(samples: &[PollutionSample]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }

    let near_term = &samples[..samples.len().min(PM25_SAMPLE_LIMIT)];
    Some(round_to_one_decimal(mean(near_term.iter().map(|s| s.pm25))))
}

/// Buckets samples by calendar date in `tz`, keeping the order in which dates
/// first appear.
pub fn daily_summaries<Tz>(samples: &[ForecastSample], tz: &Tz) -> Vec<DailySummary>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut buckets: Vec<(String, Vec<&ForecastSample>)> = Vec::new();

    for sample in samples {
        let date = sample
            .timestamp
            .with_timezone(tz)
            .format("%Y-%m-%d")
            .to_string();

        match buckets.iter_mut().find(|(d, _)| *d == date) {
            Some((_, bucket)) => bucket.push(sample),
            None => buckets.push((date, vec![sample])),
        }
    }

    buckets
        .into_iter()
        .map(|(date, bucket)| DailySummary {
            icon: bucket[0].condition_icon.clone(),
            avg_temp: round_to_one_decimal(mean(bucket.iter().map(|s| s.temperature))),
            avg_wind_speed: round_to_one_decimal(mean(bucket.iter().map(|s| s.wind_speed))),
            total_rain: round_to_one_decimal(
                bucket.iter().map(|s| s.rain_volume.unwrap_or(0.0)).sum(),
            ),
            date,
        })
        .collect()
}
