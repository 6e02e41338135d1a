//! Conversion between Esri JSON polygons and `geo` geometries.
//!
//! Esri rings carry no explicit exterior/hole structure: exterior rings
//! wind clockwise and holes counter-clockwise. Hand-drawn rings may wind
//! either way, so a counter-clockwise ring that is not inside any
//! exterior is read as an exterior of its own.

use geo::orient::{Direction, Orient as _};
use geo::{
    BoundingRect as _, Contains as _, Coord, LineString, MultiPolygon, Point, Polygon, Winding as _,
};
use thiserror::Error;
use uic_inventory_boundary_models::map::Extent;
use uic_inventory_site_models::{EsriPolygon, SpatialReference};

/// Errors from boundary geometry operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// The two operands are in different coordinate systems.
    #[error("Spatial reference mismatch: {left} vs {right}")]
    SpatialReferenceMismatch {
        /// WKID of the left operand.
        left: u32,
        /// WKID of the right operand.
        right: u32,
    },

    /// A ring has fewer than three distinct vertices.
    #[error("Ring {ring} has {vertices} distinct vertices; at least 3 are required")]
    DegenerateRing {
        /// Index of the offending ring.
        ring: usize,
        /// Distinct vertices found.
        vertices: usize,
    },
}

/// Converts an Esri polygon to a `geo` multipolygon.
///
/// Empty rings are skipped.
///
/// # Errors
///
/// Returns [`GeometryError::DegenerateRing`] if a non-empty ring cannot
/// enclose an area.
pub fn to_multi_polygon(polygon: &EsriPolygon) -> Result<MultiPolygon<f64>, GeometryError> {
    let mut exteriors: Vec<(LineString<f64>, Vec<LineString<f64>>)> = Vec::new();
    let mut counter_clockwise = Vec::new();

    for (index, ring) in polygon.rings.iter().enumerate() {
        if ring.is_empty() {
            continue;
        }

        let line = ring_to_line_string(index, ring)?;
        if line.is_cw() {
            exteriors.push((line, Vec::new()));
        } else {
            counter_clockwise.push(line);
        }
    }

    for ring in counter_clockwise {
        let first = ring.0[0];
        let container = exteriors.iter_mut().find(|(exterior, _)| {
            Polygon::new(exterior.clone(), Vec::new()).contains(&Point::from(first))
        });

        match container {
            Some((_, holes)) => holes.push(ring),
            None => exteriors.push((ring, Vec::new())),
        }
    }

    Ok(MultiPolygon::new(
        exteriors
            .into_iter()
            .map(|(exterior, holes)| Polygon::new(exterior, holes))
            .collect(),
    ))
}

/// Converts a `geo` multipolygon back to an Esri polygon.
///
/// Returns `None` when the multipolygon has no area, which is how an
/// emptied boundary is represented.
#[must_use]
pub fn from_multi_polygon(
    multi_polygon: &MultiPolygon<f64>,
    spatial_reference: SpatialReference,
) -> Option<EsriPolygon> {
    let oriented = multi_polygon.orient(Direction::Reversed);
    let mut rings = Vec::new();

    for polygon in &oriented {
        if polygon.exterior().0.is_empty() {
            continue;
        }
        rings.push(line_string_to_ring(polygon.exterior()));
        rings.extend(polygon.interiors().iter().map(line_string_to_ring));
    }

    if rings.is_empty() {
        None
    } else {
        Some(EsriPolygon::new(rings, spatial_reference))
    }
}

/// Bounding extent of a polygon, or `None` if it has no vertices.
#[must_use]
pub fn extent(polygon: &EsriPolygon) -> Option<Extent> {
    let mut vertices = polygon.rings.iter().flatten();
    let first = vertices.next()?;

    let rect = LineString::from(
        std::iter::once(first)
            .chain(vertices)
            .map(|[x, y]| Coord { x: *x, y: *y })
            .collect::<Vec<_>>(),
    )
    .bounding_rect()?;

    Some(Extent {
        xmin: rect.min().x,
        ymin: rect.min().y,
        xmax: rect.max().x,
        ymax: rect.max().y,
    })
}

/// Checks that two polygons can be combined.
pub(crate) fn ensure_same_reference(
    a: &EsriPolygon,
    b: &EsriPolygon,
) -> Result<(), GeometryError> {
    if a.spatial_reference.is_equivalent(&b.spatial_reference) {
        Ok(())
    } else {
        Err(GeometryError::SpatialReferenceMismatch {
            left: a.spatial_reference.wkid,
            right: b.spatial_reference.wkid,
        })
    }
}

/// Builds a closed line string from an Esri ring.
fn ring_to_line_string(
    index: usize,
    ring: &[[f64; 2]],
) -> Result<LineString<f64>, GeometryError> {
    let coords: Vec<Coord<f64>> = ring.iter().map(|[x, y]| Coord { x: *x, y: *y }).collect();

    let mut distinct = coords.clone();
    distinct.dedup();
    if distinct.len() > 1 && distinct.first() == distinct.last() {
        distinct.pop();
    }
    if distinct.len() < 3 {
        return Err(GeometryError::DegenerateRing {
            ring: index,
            vertices: distinct.len(),
        });
    }

    let mut line = LineString::new(coords);
    line.close();
    Ok(line)
}

fn line_string_to_ring(line: &LineString<f64>) -> Vec<[f64; 2]> {
    line.coords().map(|c| [c.x, c.y]).collect()
}
