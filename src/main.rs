use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cache;
mod config;
mod error;
mod forecast;
mod places;
mod report;
mod routes;
mod scoring;
mod upstream;

use cache::TtlCache;
use config::Config;
use forecast::openweather::OpenWeatherClient;
use places::{ImageResolver, PlacesClient};
use report::WeatherAggregator;
use routes::{create_router, AppState};
use upstream::UpstreamClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "travel_weather_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let timezone = config.timezone()?;

    let upstream = UpstreamClient::new()?;

    // Separate keyspaces: lowercase city for reports, raw city for images.
    let weather_cache: TtlCache<report::WeatherReport> = TtlCache::new(config.cache_ttl());
    let image_cache: TtlCache<places::CityImage> = TtlCache::new(config.cache_ttl());
    tracing::info!(
        "Caching reports and images for {:?}, bucketing days in {}",
        weather_cache.ttl(),
        timezone
    );

    let aggregator = WeatherAggregator::new(
        Arc::new(OpenWeatherClient::new(upstream.clone(), config.clone())),
        weather_cache,
        timezone,
    );
    let images = ImageResolver::new(PlacesClient::new(upstream, config.clone()), image_cache);

    let bind_addr = config.bind_addr.clone();
    let state = AppState {
        config: Arc::new(config),
        aggregator: Arc::new(aggregator),
        images: Arc::new(images),
    };

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Server running on http://{}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
