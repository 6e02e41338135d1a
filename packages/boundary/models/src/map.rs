//! Map-surface value types exchanged with the injected map view.

use serde::{Deserialize, Serialize};
use uic_inventory_site_models::{EsriPolygon, MapPoint};

/// Handle of a live map event subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionId(pub u64);

/// The kind of map input a tool listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SubscriptionKind {
    /// Clicks delivered without waiting for double-click detection.
    ImmediateClick,
    /// Regular clicks, optionally with the default popup suppressed.
    Click {
        /// Stop the map from opening its feature popup.
        suppress_popup: bool,
    },
    /// An interactive polygon drawing session.
    PolygonDraw,
}

/// A pixel position on the map surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    /// Pixels from the left edge.
    pub x: f64,
    /// Pixels from the top edge.
    pub y: f64,
}

/// Input delivered to a subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum MapEvent {
    /// The map was clicked.
    Click {
        /// Where on screen.
        screen_point: ScreenPoint,
        /// Where on the map.
        map_point: MapPoint,
    },
    /// A vertex was added to the polygon being drawn.
    DrawVertexAdded {
        /// Vertices so far, in map coordinates.
        vertices: Vec<[f64; 2]>,
    },
    /// The polygon drawing was finished.
    DrawComplete {
        /// Final vertices, in map coordinates.
        vertices: Vec<[f64; 2]>,
    },
}

/// A hit-test the host must run against the parcel layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitTestRequest {
    /// Subscription that asked for the hit-test.
    pub subscription: SubscriptionId,
    /// Where the user clicked.
    pub screen_point: ScreenPoint,
    /// Layer to restrict the hit-test to.
    pub layer_id: String,
}

/// Symbol a graphic is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Symbol {
    /// Map pin for the site point.
    Pin,
    /// Filled outline for the site boundary.
    Polygon,
    /// In-progress sketch outline.
    Sketch,
}

/// Geometry carried by a graphic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum GraphicGeometry {
    /// A single point.
    Point {
        /// The point.
        point: MapPoint,
    },
    /// A polygon.
    Polygon {
        /// The polygon.
        polygon: EsriPolygon,
    },
}

/// Something drawn on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graphic {
    /// What to draw.
    pub geometry: GraphicGeometry,
    /// How to draw it.
    pub symbol: Symbol,
}

impl Graphic {
    /// A pin at `point`.
    #[must_use]
    pub const fn pin(point: MapPoint) -> Self {
        Self {
            geometry: GraphicGeometry::Point { point },
            symbol: Symbol::Pin,
        }
    }

    /// A filled site boundary.
    #[must_use]
    pub const fn boundary(polygon: EsriPolygon) -> Self {
        Self {
            geometry: GraphicGeometry::Polygon { polygon },
            symbol: Symbol::Polygon,
        }
    }

    /// An in-progress sketch.
    #[must_use]
    pub const fn sketch(polygon: EsriPolygon) -> Self {
        Self {
            geometry: GraphicGeometry::Polygon { polygon },
            symbol: Symbol::Sketch,
        }
    }
}

/// Graphic slots the capture session manages. Each holds zero or one
/// graphic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GraphicLayer {
    /// The site boundary.
    SitePolygon,
    /// The site address point.
    SitePoint,
    /// The polygon currently being drawn.
    Drawing,
}

/// Where the map should move to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Viewpoint {
    /// Center on a point at a fixed scale.
    Point {
        /// Target point.
        point: MapPoint,
        /// Map scale denominator.
        scale: f64,
    },
    /// Fit an extent.
    Extent {
        /// Extent to fit.
        extent: Extent,
    },
}

/// An axis-aligned rectangle in map coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extent {
    /// Minimum x.
    pub xmin: f64,
    /// Minimum y.
    pub ymin: f64,
    /// Maximum x.
    pub xmax: f64,
    /// Maximum y.
    pub ymax: f64,
}

impl Extent {
    /// Scales the extent about its center by `factor`.
    #[must_use]
    pub fn expand(self, factor: f64) -> Self {
        let cx = f64::midpoint(self.xmin, self.xmax);
        let cy = f64::midpoint(self.ymin, self.ymax);
        let half_w = (self.xmax - self.xmin) * factor / 2.0;
        let half_h = (self.ymax - self.ymin) * factor / 2.0;

        Self {
            xmin: cx - half_w,
            ymin: cy - half_h,
            xmax: cx + half_w,
            ymax: cy + half_h,
        }
    }
}
