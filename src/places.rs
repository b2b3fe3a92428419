use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::cache::TtlCache;
use crate::config::Config;
use crate::error::{AppError, LookupFailure};
use crate::upstream::{Endpoint, UpstreamClient, UpstreamError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceSearchResponse {
    #[serde(default)]
    pub candidates: Vec<PlaceCandidate>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceCandidate {
    #[serde(default)]
    pub photos: Vec<PlacePhoto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacePhoto {
    pub photo_reference: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityImage {
    pub city_image: String,
}

pub struct PlacesClient {
    upstream: UpstreamClient,
    config: Config,
}

impl PlacesClient {
    pub fn new(upstream: UpstreamClient, config: Config) -> Self {
        Self { upstream, config }
    }

    pub async fn find_place(&self, text: &str) -> Result<PlaceSearchResponse, UpstreamError> {
        let url = format!(
            "{}{}",
            self.config.google_maps_base_url, self.config.place_search_path
        );

        self.upstream
            .fetch(Endpoint::PlaceSearch, &url, &[
                ("input", text),
                ("inputtype", "textquery"),
                ("fields", "photos"),
                ("key", &self.config.google_api_key),
            ])
            .await
    }

    /// URL of the photo endpoint for `photo_reference`; the image itself is not fetched.
    pub fn photo_url(&self, photo_reference: &str) -> String {
        format!(
            "{}{}?maxwidth={}&photoreference={}&key={}",
            self.config.google_maps_base_url,
            self.config.place_photo_path,
            self.config.place_photo_max_width,
            urlencoding::encode(photo_reference),
            urlencoding::encode(&self.config.google_api_key),
        )
    }
}

/// Resolves a representative photo URL per city, memoized on the city string
/// exactly as given.
pub struct ImageResolver {
    client: PlacesClient,
    cache: TtlCache<CityImage>,
}

impl ImageResolver {
    pub fn new(client: PlacesClient, cache: TtlCache<CityImage>) -> Self {
        Self { client, cache }
    }

    #[instrument(skip(self))]
    pub async fn get_image(&self, city: &str) -> Result<CityImage, AppError> {
        if let Some(image) = self.cache.lookup(city).await {
            debug!("Image cache hit for {}", city);
            return Ok(image);
        }

        self.cache
            .get_or_try_insert_with(city.to_string(), self.resolve(city))
            .await
            .map_err(|failure| {
                warn!("City image for {} failed at {}: {}", city, failure.endpoint(), failure);
                AppError::CityImageNotFound(failure)
            })
    }

    async fn resolve(&self, city: &str) -> Result<CityImage, LookupFailure> {
        let places = self.client.find_place(city).await?;
        if places.candidates.is_empty() {
            debug!(
                "Place search for {} returned no candidates (status {:?})",
                city, places.status
            );
        }

        // First candidate, first photo. No ranking.
        let reference = places
            .candidates
            .first()
            .and_then(|candidate| candidate.photos.first())
            .map(|photo| photo.photo_reference.as_str())
            .ok_or(LookupFailure::MissingField {
                field: "candidates[0].photos[0]",
                endpoint: Endpoint::PlaceSearch,
            })?;

        Ok(CityImage {
            city_image: self.client.photo_url(reference),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn resolver_for(mock_server: &MockServer) -> (ImageResolver, TtlCache<CityImage>) {
        let client = PlacesClient::new(
            UpstreamClient::new().unwrap(),
            Config::for_base_url(&mock_server.uri()),
        );
        let cache = TtlCache::default();
        (ImageResolver::new(client, cache.clone()), cache)
    }

    #[tokio::test]
    async fn test_first_candidate_first_photo() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/maps/api/place/findplacefromtext/json"))
            .and(query_param("input", "Kyoto"))
            .and(query_param("inputtype", "textquery"))
            .and(query_param("fields", "photos"))
            .and(query_param("key", "google-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [
                    { "photos": [
                        { "photo_reference": "AbC-123", "height": 3000, "width": 4000 },
                        { "photo_reference": "second" }
                    ] },
                    { "photos": [{ "photo_reference": "other-candidate" }] }
                ],
                "status": "OK"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (resolver, cache) = resolver_for(&mock_server);
        let image = resolver.get_image("Kyoto").await.unwrap();

        assert_eq!(
            image.city_image,
            format!(
                "{}/maps/api/place/photo?maxwidth=800&photoreference=AbC-123&key=google-key",
                mock_server.uri()
            )
        );

        // Served from cache; the mock only allows one call.
        assert_eq!(resolver.get_image("Kyoto").await.unwrap(), image);
        assert!(cache.lookup("Kyoto").await.is_some());
        assert!(cache.lookup("kyoto").await.is_none());
    }

    #[tokio::test]
    async fn test_no_candidates_is_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/maps/api/place/findplacefromtext/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [],
                "status": "ZERO_RESULTS"
            })))
            .mount(&mock_server)
            .await;

        let (resolver, cache) = resolver_for(&mock_server);
        let err = resolver.get_image("Atlantis").await.unwrap_err();

        assert_eq!(err.to_string(), "City image not found");
        assert!(matches!(
            err,
            AppError::CityImageNotFound(ref f) if matches!(f.as_ref(), LookupFailure::MissingField { .. })
        ));
        assert_eq!(cache.entry_count().await, 0);
    }

    #[tokio::test]
    async fn test_candidate_without_photos_is_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/maps/api/place/findplacefromtext/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{}],
                "status": "OK"
            })))
            .mount(&mock_server)
            .await;

        let (resolver, _) = resolver_for(&mock_server);
        assert!(resolver.get_image("Smallville").await.is_err());
    }

    #[tokio::test]
    async fn test_upstream_error_is_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/maps/api/place/findplacefromtext/json"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&mock_server)
            .await;

        let (resolver, _) = resolver_for(&mock_server);
        let err = resolver.get_image("Paris").await.unwrap_err();

        assert!(matches!(
            err,
            AppError::CityImageNotFound(ref f) if f.endpoint() == Endpoint::PlaceSearch
        ));
    }

    #[test]
    fn test_photo_url_encodes_reference() {
        let client = PlacesClient::new(
            UpstreamClient::new().unwrap(),
            Config::for_base_url("https://maps.example.com"),
        );

        assert_eq!(
            client.photo_url("a b/c"),
            "https://maps.example.com/maps/api/place/photo?maxwidth=800&photoreference=a%20b%2Fc&key=google-key"
        );
    }

    #[test]
    fn test_city_image_json() {
        let image = CityImage {
            city_image: "https://example.com/p".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&image).unwrap(),
            serde_json::json!({ "cityImage": "https://example.com/p" })
        );
    }
}
