use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    config::Config,
    error::AppError,
    places::{CityImage, ImageResolver},
    report::{WeatherAggregator, WeatherReport},
};

// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub aggregator: Arc<WeatherAggregator>,
    pub images: Arc<ImageResolver>,
}

#[derive(Debug, Deserialize)]
pub struct CityImageQuery {
    pub city: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: String,
    pub cache_ttl_ms: u64,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        cache_ttl_ms: state.config.cache_ttl_ms,
    })
}

pub async fn get_weather(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Result<Json<WeatherReport>, AppError> {
    let report = state.aggregator.get_report(&city).await?;
    Ok(Json(report))
}

pub async fn fetch_city_image(
    State(state): State<AppState>,
    Query(params): Query<CityImageQuery>,
) -> Result<Json<CityImage>, AppError> {
    let image = state.images.get_image(&params.city).await?;
    Ok(Json(image))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/weather/:city", get(get_weather))
        .route("/fetchCityImage", get(fetch_city_image))
        .with_state(state)
}
