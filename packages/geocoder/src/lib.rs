#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Address geocoding for site locations.
//!
//! Resolves a street address and zone (city or ZIP code) to a single
//! point in the map's spatial reference. Providers are configured via
//! TOML files in `services/` and exposed through the [`Geocoder`] trait so
//! the boundary capture session does not depend on a specific service.
//!
//! A "no match" is a normal outcome (`Ok(None)`), not an error: callers
//! fall back to picking the site point on the map.

pub mod service_registry;
pub mod web_api;

use thiserror::Error;
use uic_inventory_site_models::MapPoint;

pub use web_api::WebApiGeocoder;

/// A geocoded address.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeMatch {
    /// The matched, standardized address.
    pub address: String,
    /// Location of the match.
    pub location: MapPoint,
    /// Match score from 0 to 100.
    pub score: f64,
}

/// Errors from geocoding operations.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// The street or zone was blank.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Which field was rejected.
        message: String,
    },

    /// The service rejected the request (bad key, quota, outage).
    #[error("Geocoding service error {status}: {message}")]
    Service {
        /// Status reported by the service.
        status: u16,
        /// Service-provided explanation.
        message: String,
    },

    /// No usable service configuration.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the missing configuration.
        message: String,
    },
}

/// Something that can resolve an address to a map point.
#[async_trait::async_trait]
pub trait Geocoder: Send + Sync {
    /// Geocodes `street` within `zone` (a city name or ZIP code).
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] if the request cannot be completed. A
    /// completed lookup without a match is `Ok(None)`.
    async fn geocode(&self, street: &str, zone: &str)
    -> Result<Option<GeocodeMatch>, GeocodeError>;
}
