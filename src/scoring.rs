use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelConditions {
    pub avg_temp: f64,
    pub has_rain: bool,
    pub pm25: f64,
    pub avg_humidity: f64,
    pub avg_wind_speed: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessWeights {
    pub temperature: f64,
    pub rain: f64,
    pub air_quality: f64,
    pub humidity: f64,
    pub wind: f64,
}

impl Default for ReadinessWeights {
    fn default() -> Self {
        Self {
            temperature: 0.30,
            rain: 0.20,
            air_quality: 0.20,
            humidity: 0.15,
            wind: 0.15,
        }
    }
}

/// Per-factor scores, each clamped to [0, 100].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub temperature: f64,
    pub rain: f64,
    pub air_quality: f64,
    pub humidity: f64,
    pub wind: f64,
}

pub const IDEAL_TEMP_C: f64 = 18.0;
const TEMP_SPREAD_C: f64 = 5.0;
const PM25_THRESHOLD: f64 = 50.0;
const IDEAL_HUMIDITY: f64 = 50.0;
const WIND_THRESHOLD_MS: f64 = 10.0;

pub fn sub_scores(conditions: &TravelConditions) -> SubScores {
    let temp_delta = conditions.avg_temp - IDEAL_TEMP_C;
    let temperature = 100.0 * (-temp_delta.powi(2) / (2.0 * TEMP_SPREAD_C.powi(2))).exp();

    let rain = if conditions.has_rain { 50.0 } else { 100.0 };

    let air_quality = if conditions.pm25 <= PM25_THRESHOLD {
        100.0
    } else {
        100.0 - (conditions.pm25 - PM25_THRESHOLD) * 0.5
    };

    let humidity = 100.0 - (conditions.avg_humidity - IDEAL_HUMIDITY).abs() * 0.5;

    let wind = if conditions.avg_wind_speed < WIND_THRESHOLD_MS {
        100.0
    } else {
        100.0 - (conditions.avg_wind_speed - WIND_THRESHOLD_MS) * 2.0
    };

    SubScores {
        temperature: temperature.clamp(0.0, 100.0),
        rain,
        air_quality: air_quality.clamp(0.0, 100.0),
        humidity: humidity.clamp(0.0, 100.0),
        wind: wind.clamp(0.0, 100.0),
    }
}

/// Weighted composite of the sub-scores, rounded to the nearest integer.
pub fn calculate_travel_readiness(conditions: &TravelConditions, weights: &ReadinessWeights) -> u8 {
    let scores = sub_scores(conditions);

    let total = scores.temperature * weights.temperature
        + scores.rain * weights.rain
        + scores.air_quality * weights.air_quality
        + scores.humidity * weights.humidity
        + scores.wind * weights.wind;

    total.round().clamp(0.0, 100.0) as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TempType {
    Cold,
    Mild,
    Hot,
}

impl TempType {
    pub fn classify(avg_temp: f64) -> Self {
        if avg_temp < 13.0 {
            TempType::Cold
        } else if avg_temp <= 23.0 {
            TempType::Mild
        } else {
            TempType::Hot
        }
    }
}

/// Formats to one decimal and parses back. Exact binary ties (x.25, x.75, ...)
/// go away from zero instead of to even.
pub fn round_to_one_decimal(value: f64) -> f64 {
    let quarters = value * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 != 0.0 {
        return (value * 10.0).round() / 10.0;
    }

    format!("{:.1}", value).parse().unwrap_or(value)
}
