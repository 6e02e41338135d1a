#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Client for the site location API.
//!
//! Loads a [`Site`](uic_inventory_site_models::Site) with
//! `GET /api/site/{id}` and persists a new address and boundary with
//! `PUT /api/site`. Failed saves are returned to the caller unchanged so
//! the form can keep its unsaved input; nothing is retried.

pub mod client;
pub mod validation;

use thiserror::Error;

pub use client::{SiteClient, parse_site_geometry};
pub use validation::{ValidationError, validate_site_location};

/// Default API base URL when `UIC_API_BASE_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Errors from site API operations.
#[derive(Debug, Error)]
pub enum SiteError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("Site API returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Server-provided explanation, or the raw body.
        message: String,
    },

    /// The response body was not the expected JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The site has no stored geometry, or it could not be parsed.
    #[error("Invalid site geometry: {message}")]
    Geometry {
        /// Description of the parsing failure.
        message: String,
    },
}

/// Connection settings for the site API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteApiConfig {
    /// Base URL of the API, without a trailing slash.
    pub base_url: String,
    /// Bearer token sent with every request, if any.
    pub token: Option<String>,
}

impl SiteApiConfig {
    /// Creates a config for `base_url` without authentication.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Reads `UIC_API_BASE_URL` and `UIC_API_TOKEN` from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("UIC_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let token = std::env::var("UIC_API_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());

        Self {
            token,
            ..Self::new(base_url)
        }
    }

    /// Adds a bearer token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

impl Default for SiteApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_slash() {
        let config = SiteApiConfig::new("https://uic.example.gov/");
        assert_eq!(config.base_url, "https://uic.example.gov");
        assert!(config.token.is_none());
    }

    #[test]
    fn token_is_attached() {
        let config = SiteApiConfig::default().with_token("abc");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.token.as_deref(), Some("abc"));
    }

    #[test]
    fn status_error_is_readable() {
        let err = SiteError::Status {
            status: 400,
            message: "Address is required".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Site API returned 400: Address is required"
        );
    }
}
