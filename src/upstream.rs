use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// The third-party endpoints the service reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    CurrentWeather,
    Forecast,
    AirPollution,
    PlaceSearch,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Endpoint::CurrentWeather => "current-weather",
            Endpoint::Forecast => "forecast",
            Endpoint::AirPollution => "air-pollution",
            Endpoint::PlaceSearch => "place-search",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("{endpoint} request failed: {source}")]
    Request {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned HTTP {status}")]
    Status {
        endpoint: Endpoint,
        status: reqwest::StatusCode,
    },
    #[error("{endpoint} response malformed: {source}")]
    Malformed {
        endpoint: Endpoint,
        #[source]
        source: serde_json::Error,
    },
}

impl UpstreamError {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            UpstreamError::Request { endpoint, .. }
            | UpstreamError::Status { endpoint, .. }
            | UpstreamError::Malformed { endpoint, .. } => *endpoint,
        }
    }
}

/// One GET per call, no retry. A non-2xx status or an unreadable body fails
/// the whole call.
#[derive(Clone)]
pub struct UpstreamClient {
    client: Client,
}

impl UpstreamClient {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent("TravelWeather/1.0")
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self { client })
    }

    pub async fn fetch_json(
        &self,
        endpoint: Endpoint,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<Value, UpstreamError> {
        let request_failed = |source| UpstreamError::Request { endpoint, source };

        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(request_failed)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("{} upstream answered HTTP {}", endpoint, status);
            return Err(UpstreamError::Status { endpoint, status });
        }

        let bytes = response.bytes().await.map_err(request_failed)?;
        serde_json::from_slice(&bytes).map_err(|source| UpstreamError::Malformed { endpoint, source })
    }

    pub async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<T, UpstreamError> {
        let json = self.fetch_json(endpoint, url, params).await?;
        serde_json::from_value(json).map_err(|source| UpstreamError::Malformed { endpoint, source })
    }
}
