//! Accumulates parcel outlines into a single site boundary.
//!
//! Clicking a parcel that is not part of the boundary unions it in;
//! clicking one that is subtracts it again. The set operations come from
//! [`geo::BooleanOps`]; an operation that leaves no area yields `None`,
//! which clears the boundary.

use std::collections::BTreeSet;

use geo::BooleanOps;
use uic_inventory_boundary_models::{ParcelChange, ParcelFeature, ParcelId};
use uic_inventory_site_models::EsriPolygon;

use crate::geometry::{
    GeometryError, ensure_same_reference, from_multi_polygon, to_multi_polygon,
};

/// The boundary after applying one parcel click.
#[derive(Debug, Clone, PartialEq)]
pub struct ParcelCombination {
    /// New boundary, `None` if nothing is left.
    pub geometry: Option<EsriPolygon>,
    /// Whether the parcel was added or removed.
    pub change: ParcelChange,
}

/// Area covered by either polygon, in the spatial reference of `a`.
///
/// # Errors
///
/// Returns [`GeometryError`] if the polygons are in different spatial
/// references or either has a degenerate ring.
pub fn union(a: &EsriPolygon, b: &EsriPolygon) -> Result<Option<EsriPolygon>, GeometryError> {
    ensure_same_reference(a, b)?;
    let left = to_multi_polygon(a)?;
    let right = to_multi_polygon(b)?;

    Ok(from_multi_polygon(
        &BooleanOps::union(&left, &right),
        a.spatial_reference,
    ))
}

/// Area of `a` not covered by `b`, in the spatial reference of `a`.
///
/// # Errors
///
/// Returns [`GeometryError`] if the polygons are in different spatial
/// references or either has a degenerate ring.
pub fn difference(
    a: &EsriPolygon,
    b: &EsriPolygon,
) -> Result<Option<EsriPolygon>, GeometryError> {
    ensure_same_reference(a, b)?;
    let left = to_multi_polygon(a)?;
    let right = to_multi_polygon(b)?;

    Ok(from_multi_polygon(
        &BooleanOps::difference(&left, &right),
        a.spatial_reference,
    ))
}

/// Adds or removes a clicked parcel.
///
/// A parcel already in `selected` is subtracted from `current`. Any other
/// parcel is unioned into `current`, or becomes the boundary outright when
/// there is none yet.
///
/// # Errors
///
/// Propagates [`GeometryError`] from the set operation.
pub fn apply_parcel(
    current: Option<&EsriPolygon>,
    selected: &BTreeSet<ParcelId>,
    parcel: &ParcelFeature,
) -> Result<ParcelCombination, GeometryError> {
    if selected.contains(&parcel.id) {
        let geometry = match current {
            Some(boundary) => difference(boundary, &parcel.geometry)?,
            None => None,
        };

        return Ok(ParcelCombination {
            geometry,
            change: ParcelChange::Removed,
        });
    }

    let geometry = match current {
        Some(boundary) => union(boundary, &parcel.geometry)?,
        None => Some(parcel.geometry.clone()),
    };

    Ok(ParcelCombination {
        geometry,
        change: ParcelChange::Added,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Area as _;
    use uic_inventory_site_models::SpatialReference;

    fn square(x: f64, y: f64, size: f64) -> EsriPolygon {
        EsriPolygon::new(
            vec![vec![
                [x, y],
                [x, y + size],
                [x + size, y + size],
                [x + size, y],
                [x, y],
            ]],
            SpatialReference::WEB_MERCATOR,
        )
    }

    fn area(polygon: &EsriPolygon) -> f64 {
        to_multi_polygon(polygon).unwrap().unsigned_area()
    }

    fn parcel(id: i64, polygon: EsriPolygon) -> ParcelFeature {
        ParcelFeature {
            id: ParcelId(id),
            geometry: polygon,
        }
    }

    #[test]
    fn union_of_adjacent_parcels_covers_both() {
        let merged = union(&square(0.0, 0.0, 10.0), &square(10.0, 0.0, 10.0))
            .unwrap()
            .unwrap();

        assert!((area(&merged) - 200.0).abs() < 1e-6);
        assert_eq!(merged.rings.len(), 1);
    }

    #[test]
    fn difference_removes_overlap() {
        let left = difference(&square(0.0, 0.0, 10.0), &square(5.0, 0.0, 10.0))
            .unwrap()
            .unwrap();
        assert!((area(&left) - 50.0).abs() < 1e-6);
    }

    #[test]
    fn difference_to_nothing_is_none() {
        let gone = difference(&square(0.0, 0.0, 10.0), &square(0.0, 0.0, 10.0)).unwrap();
        assert!(gone.is_none());
    }

    #[test]
    fn first_parcel_becomes_boundary() {
        let first = parcel(1, square(0.0, 0.0, 10.0));
        let combined = apply_parcel(None, &BTreeSet::new(), &first).unwrap();

        assert_eq!(combined.change, ParcelChange::Added);
        assert_eq!(combined.geometry, Some(first.geometry));
    }

    #[test]
    fn new_parcel_is_unioned() {
        let current = square(0.0, 0.0, 10.0);
        let selected = BTreeSet::from([ParcelId(1)]);
        let combined =
            apply_parcel(Some(&current), &selected, &parcel(2, square(10.0, 0.0, 10.0))).unwrap();

        assert_eq!(combined.change, ParcelChange::Added);
        assert!((area(&combined.geometry.unwrap()) - 200.0).abs() < 1e-6);
    }

    #[test]
    fn selected_parcel_is_subtracted() {
        let current = union(&square(0.0, 0.0, 10.0), &square(10.0, 0.0, 10.0))
            .unwrap()
            .unwrap();
        let selected = BTreeSet::from([ParcelId(1), ParcelId(2)]);
        let combined =
            apply_parcel(Some(&current), &selected, &parcel(2, square(10.0, 0.0, 10.0))).unwrap();

        assert_eq!(combined.change, ParcelChange::Removed);
        assert!((area(&combined.geometry.unwrap()) - 100.0).abs() < 1e-6);
    }

    #[test]
    fn mismatched_reference_propagates() {
        let current = square(0.0, 0.0, 10.0);
        let mut other = square(10.0, 0.0, 10.0);
        other.spatial_reference = SpatialReference::WGS84;

        let err = apply_parcel(Some(&current), &BTreeSet::new(), &parcel(3, other)).unwrap_err();
        assert!(matches!(err, GeometryError::SpatialReferenceMismatch { .. }));
    }
}
