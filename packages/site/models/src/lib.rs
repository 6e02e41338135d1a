#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Site record and site location types shared by the API client and the
//! boundary capture workflow.
//!
//! Site boundaries travel over the wire as Esri JSON polygons serialized
//! to a string (`{ "rings": [...], "spatialReference": { "wkid": ... } }`).
//! [`EsriPolygon`] is the parsed form of that string.

use serde::{Deserialize, Serialize};

/// A site as returned by `GET /api/site/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    /// Site identifier.
    pub id: i64,
    /// Display name of the site.
    #[serde(default)]
    pub name: Option<String>,
    /// Free-text street address or a `"lon, lat"` coordinate string.
    #[serde(default)]
    pub address: Option<String>,
    /// Site boundary as Esri JSON polygon text.
    #[serde(default)]
    pub geometry: Option<String>,
    /// Primary NAICS code.
    #[serde(default)]
    pub naics_primary: Option<String>,
    /// Primary NAICS title.
    #[serde(default)]
    pub naics_title: Option<String>,
    /// Review status label.
    #[serde(default)]
    pub status: Option<String>,
}

/// Body of `PUT /api/site` when updating a site's location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteLocationInput {
    /// Account identifier of the submitting user.
    pub id: i64,
    /// Site being updated.
    pub site_id: i64,
    /// Site address.
    pub address: String,
    /// Site boundary as Esri JSON polygon text.
    pub geometry: String,
}

/// Well-known spatial reference identifiers used by the map.
pub mod wkid {
    /// Web Mercator (auxiliary sphere).
    pub const WEB_MERCATOR: u32 = 3857;
    /// Legacy Esri identifier for Web Mercator.
    pub const WEB_MERCATOR_LEGACY: u32 = 102_100;
    /// Geographic WGS84 longitude/latitude.
    pub const WGS84: u32 = 4326;
}

/// Spatial reference attached to every geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpatialReference {
    /// Well-known identifier.
    pub wkid: u32,
    /// Most recent identifier, when the service reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_wkid: Option<u32>,
}

impl SpatialReference {
    /// Web Mercator, the spatial reference of the site map.
    pub const WEB_MERCATOR: Self = Self::new(wkid::WEB_MERCATOR);

    /// Geographic WGS84.
    pub const WGS84: Self = Self::new(wkid::WGS84);

    /// Creates a spatial reference from a well-known identifier.
    #[must_use]
    pub const fn new(wkid: u32) -> Self {
        Self {
            wkid,
            latest_wkid: None,
        }
    }

    /// Whether this is Web Mercator under either of its identifiers.
    #[must_use]
    pub const fn is_web_mercator(&self) -> bool {
        matches!(
            self.wkid,
            wkid::WEB_MERCATOR | wkid::WEB_MERCATOR_LEGACY
        ) || matches!(
            self.latest_wkid,
            Some(wkid::WEB_MERCATOR | wkid::WEB_MERCATOR_LEGACY)
        )
    }

    /// Whether two references describe the same coordinate system.
    #[must_use]
    pub const fn is_equivalent(&self, other: &Self) -> bool {
        self.wkid == other.wkid || (self.is_web_mercator() && other.is_web_mercator())
    }
}

impl Default for SpatialReference {
    fn default() -> Self {
        Self::WEB_MERCATOR
    }
}

/// A polygon in Esri JSON form.
///
/// Each ring is a closed sequence of `[x, y]` vertices. Exterior rings
/// wind clockwise and holes counter-clockwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EsriPolygon {
    /// Polygon rings.
    pub rings: Vec<Vec<[f64; 2]>>,
    /// Spatial reference of the ring coordinates.
    #[serde(default)]
    pub spatial_reference: SpatialReference,
}

impl EsriPolygon {
    /// Creates a polygon from rings in the given spatial reference.
    #[must_use]
    pub const fn new(rings: Vec<Vec<[f64; 2]>>, spatial_reference: SpatialReference) -> Self {
        Self {
            rings,
            spatial_reference,
        }
    }

    /// Whether the polygon has no rings or only empty rings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rings.iter().all(Vec::is_empty)
    }

    /// Total number of vertices across all rings.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.rings.iter().map(Vec::len).sum()
    }
}

/// A point on the map, tagged with its spatial reference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPoint {
    /// Easting (or longitude).
    pub x: f64,
    /// Northing (or latitude).
    pub y: f64,
    /// Spatial reference of `x`/`y`.
    #[serde(default)]
    pub spatial_reference: SpatialReference,
}

impl MapPoint {
    /// Creates a Web Mercator point.
    #[must_use]
    pub const fn web_mercator(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            spatial_reference: SpatialReference::WEB_MERCATOR,
        }
    }
}
