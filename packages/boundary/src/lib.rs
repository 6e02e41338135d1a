#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Site boundary capture workflow.
//!
//! The user gives a site an address (geocoded or clicked on the map) and
//! a boundary (a union of clicked parcels or a freehand polygon). The
//! pieces:
//!
//! - [`reducer`]: pure state transitions over
//!   [`BoundaryCaptureState`](uic_inventory_boundary_models::BoundaryCaptureState).
//! - [`combine`]: parcel union/difference on top of [`geo`].
//! - [`adapters`]: one map subscription per active tool.
//! - [`form`]: pushes state changes into the form and map.
//! - [`session`]: ties them together over an injected [`view::MapView`].

pub mod adapters;
pub mod combine;
pub mod form;
pub mod geometry;
pub mod parcels;
pub mod projection;
pub mod reducer;
pub mod session;
pub mod view;

use thiserror::Error;
use uic_inventory_site::{SiteError, ValidationError};

pub use form::{FormState, SiteLocationForm};
pub use geometry::GeometryError;
pub use reducer::reduce;
pub use session::BoundaryCaptureSession;
pub use view::MapView;

/// Errors from loading, editing, or saving a site location.
#[derive(Debug, Error)]
pub enum BoundaryError {
    /// A boundary could not be built or combined.
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// The form is missing a required field.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Loading or saving the site failed.
    #[error(transparent)]
    Site(#[from] SiteError),

    /// Geometry could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Parcel `GeoJSON` could not be parsed.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// A parcel feature could not be used.
    #[error("Invalid parcel: {message}")]
    Parcel {
        /// What was wrong with the feature.
        message: String,
    },
}
