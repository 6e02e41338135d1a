//! UGRC web API geocoder client.
//!
//! Single-address endpoint: `GET {base}/geocode/{street}/{zone}`. The API
//! answers `404` when no candidate scores above its threshold, which is
//! reported here as no match.
//!
//! See <https://api.mapserv.utah.gov/docs/>

use serde::Deserialize;
use uic_inventory_site_models::{MapPoint, SpatialReference};

use crate::service_registry::{GeocodingService, ProviderConfig, enabled_services};
use crate::{GeocodeError, GeocodeMatch, Geocoder};

/// Environment variable holding the web API key.
pub const API_KEY_ENV: &str = "UGRC_API_KEY";

/// Geocoder backed by the UGRC web API.
pub struct WebApiGeocoder {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    spatial_reference: u32,
    min_score: f64,
}

#[derive(Deserialize)]
struct WebApiResponse {
    status: u16,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    result: Option<WebApiResult>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WebApiResult {
    location: WebApiLocation,
    score: f64,
    match_address: String,
}

#[derive(Deserialize)]
struct WebApiLocation {
    x: f64,
    y: f64,
}

impl WebApiGeocoder {
    /// Creates a geocoder from a service definition.
    #[must_use]
    pub fn from_service(service: &GeocodingService, api_key: String) -> Self {
        let ProviderConfig::WebApi {
            base_url,
            spatial_reference,
            min_score,
        } = &service.provider;

        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            spatial_reference: *spatial_reference,
            min_score: *min_score,
        }
    }

    /// Creates a geocoder from the highest-priority enabled service and
    /// the `UGRC_API_KEY` environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Config`] if no service is enabled or the
    /// API key is missing.
    pub fn from_env() -> Result<Self, GeocodeError> {
        let service = enabled_services()
            .into_iter()
            .next()
            .ok_or_else(|| GeocodeError::Config {
                message: "no geocoding service is enabled".to_string(),
            })?;

        let api_key = std::env::var(API_KEY_ENV).map_err(|_| GeocodeError::Config {
            message: format!("{API_KEY_ENV} is not set"),
        })?;

        log::debug!("Using geocoding service {} ({})", service.name, service.id);
        Ok(Self::from_service(&service, api_key))
    }

    fn geocode_url(&self, street: &str, zone: &str) -> Result<reqwest::Url, GeocodeError> {
        let mut url = reqwest::Url::parse(&self.base_url).map_err(|e| GeocodeError::Config {
            message: format!("invalid base url {}: {e}", self.base_url),
        })?;

        url.path_segments_mut()
            .map_err(|()| GeocodeError::Config {
                message: format!("base url {} cannot have a path", self.base_url),
            })?
            .extend(["geocode", street, zone]);

        url.query_pairs_mut()
            .append_pair("apiKey", &self.api_key)
            .append_pair("spatialReference", &self.spatial_reference.to_string());

        Ok(url)
    }

    /// Parses a web API response body into a match.
    fn parse_response(&self, body: &str) -> Result<Option<GeocodeMatch>, GeocodeError> {
        let response: WebApiResponse =
            serde_json::from_str(body).map_err(|e| GeocodeError::Parse {
                message: format!("invalid web API response: {e}"),
            })?;

        match response.status {
            200 => {}
            404 => return Ok(None),
            status => {
                return Err(GeocodeError::Service {
                    status,
                    message: response.message.unwrap_or_default(),
                });
            }
        }

        let Some(result) = response.result else {
            return Ok(None);
        };

        if result.score < self.min_score {
            log::debug!(
                "Discarding match '{}' with score {} below {}",
                result.match_address,
                result.score,
                self.min_score
            );
            return Ok(None);
        }

        Ok(Some(GeocodeMatch {
            address: result.match_address,
            location: MapPoint {
                x: result.location.x,
                y: result.location.y,
                spatial_reference: SpatialReference::new(self.spatial_reference),
            },
            score: result.score,
        }))
    }
}

#[async_trait::async_trait]
impl Geocoder for WebApiGeocoder {
    async fn geocode(
        &self,
        street: &str,
        zone: &str,
    ) -> Result<Option<GeocodeMatch>, GeocodeError> {
        let street = street.trim();
        let zone = zone.trim();

        if street.is_empty() {
            return Err(GeocodeError::InvalidInput {
                message: "street address is required".to_string(),
            });
        }
        if zone.is_empty() {
            return Err(GeocodeError::InvalidInput {
                message: "city or zip code is required".to_string(),
            });
        }

        let url = self.geocode_url(street, zone)?;
        let resp = self.client.get(url).send().await?;
        let body = resp.text().await?;

        let found = self.parse_response(&body)?;
        match &found {
            Some(m) => log::info!("Geocoded '{street}, {zone}' to '{}'", m.address),
            None => log::info!("No match for '{street}, {zone}'"),
        }
        Ok(found)
    }
}
