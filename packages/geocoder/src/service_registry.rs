//! Compile-time registry of geocoding service configurations.
//!
//! Each geocoding service is defined in a TOML file under `services/`.
//! The registry embeds these at compile time and exposes them via
//! [`all_services`] and [`enabled_services`].

use serde::Deserialize;

/// A geocoding service configuration loaded from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingService {
    /// Unique identifier (e.g., `"ugrc"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Whether this service may be used.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Preference order, lower first.
    pub priority: u32,
    /// Provider-specific configuration.
    pub provider: ProviderConfig,
}

/// Provider-specific configuration, tagged by `type` in TOML.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// UGRC web API single-address geocoder.
    WebApi {
        /// API base URL (e.g., `"https://api.mapserv.utah.gov/api/v1"`).
        base_url: String,
        /// Spatial reference requested for match locations.
        #[serde(default = "default_spatial_reference")]
        spatial_reference: u32,
        /// Matches scoring below this are treated as no match.
        #[serde(default = "default_min_score")]
        min_score: f64,
    },
}

const fn default_true() -> bool {
    true
}

const fn default_spatial_reference() -> u32 {
    3857
}

const fn default_min_score() -> f64 {
    70.0
}

impl GeocodingService {
    /// Returns the provider's base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        match &self.provider {
            ProviderConfig::WebApi { base_url, .. } => base_url,
        }
    }
}

// ── Compile-time embedded TOML files ────────────────────────────────

const SERVICE_TOMLS: &[(&str, &str)] = &[
    ("ugrc", include_str!("../services/ugrc.toml")),
    ("ugrc_staging", include_str!("../services/ugrc_staging.toml")),
];

#[cfg(test)]
const EXPECTED_SERVICE_COUNT: usize = 2;

/// Returns all geocoding service configurations (enabled and disabled).
///
/// # Panics
///
/// Panics if any TOML config is malformed (this is a compile-time guarantee
/// since the configs are embedded).
#[must_use]
pub fn all_services() -> Vec<GeocodingService> {
    SERVICE_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse geocoding service '{name}': {e}"))
        })
        .collect()
}

/// Returns only enabled services, sorted by priority (ascending).
#[must_use]
pub fn enabled_services() -> Vec<GeocodingService> {
    let mut services: Vec<GeocodingService> =
        all_services().into_iter().filter(|s| s.enabled).collect();
    services.sort_by_key(|s| s.priority);
    services
}

/// Looks up a service by id, enabled or not.
#[must_use]
pub fn find_service(id: &str) -> Option<GeocodingService> {
    all_services().into_iter().find(|s| s.id == id)
}
