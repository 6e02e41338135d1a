//! Web Mercator to geographic conversion for clicked site points.

use std::f64::consts::FRAC_PI_2;

use uic_inventory_site_models::{MapPoint, SpatialReference};

/// Semi-major axis of the WGS84 ellipsoid, in meters.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Clicked coordinates are kept to five decimal places (about a meter).
const DECIMAL_PLACES: f64 = 100_000.0;

/// Converts a Web Mercator point to WGS84 longitude/latitude.
///
/// Longitude is wrapped into `[-180, 180)`.
#[must_use]
pub fn web_mercator_to_geographic(point: MapPoint) -> MapPoint {
    let lon = (point.x / EARTH_RADIUS_M).to_degrees();
    let lon = lon - ((lon + 180.0) / 360.0).floor() * 360.0;
    let lat = (-2.0f64)
        .mul_add((-point.y / EARTH_RADIUS_M).exp().atan(), FRAC_PI_2)
        .to_degrees();

    MapPoint {
        x: lon,
        y: lat,
        spatial_reference: SpatialReference::WGS84,
    }
}

/// Rounds to five decimal places, halves rounding up as in a browser.
#[must_use]
pub fn round_coordinate(value: f64) -> f64 {
    let rounded = (value * DECIMAL_PLACES + 0.5).floor() / DECIMAL_PLACES;
    // normalizes -0.0
    rounded + 0.0
}

/// Formats a clicked point as the `"{lon}, {lat}"` address text.
///
/// Web Mercator points are projected first; points in any other
/// reference are assumed to already be geographic.
#[must_use]
pub fn format_address(point: MapPoint) -> String {
    let geographic = if point.spatial_reference.is_web_mercator() {
        web_mercator_to_geographic(point)
    } else {
        point
    };

    format!(
        "{}, {}",
        round_coordinate(geographic.x),
        round_coordinate(geographic.y)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projects_salt_lake_valley_point() {
        let geographic =
            web_mercator_to_geographic(MapPoint::web_mercator(-12_462_000.0, 4_976_000.0));
        assert!((geographic.x - -111.948_050_706_974_77).abs() < 1e-9);
        assert!((geographic.y - 40.753_155_137_376_545).abs() < 1e-9);
        assert_eq!(geographic.spatial_reference, SpatialReference::WGS84);
    }

    #[test]
    fn formats_clicked_address_to_five_places() {
        let address = format_address(MapPoint::web_mercator(-12_462_000.0, 4_976_000.0));
        assert_eq!(address, "-111.94805, 40.75316");
    }

    #[test]
    fn origin_formats_without_negative_zero() {
        assert_eq!(format_address(MapPoint::web_mercator(0.0, 0.0)), "0, 0");
        assert_eq!(format_address(MapPoint::web_mercator(-0.1, -0.1)), "0, 0");
    }

    #[test]
    fn geographic_points_are_not_projected() {
        let point = MapPoint {
            x: -111.123_456_7,
            y: 40.987_654_3,
            spatial_reference: SpatialReference::WGS84,
        };
        assert_eq!(format_address(point), "-111.12346, 40.98765");
    }

    #[test]
    fn longitude_wraps_past_antimeridian() {
        let geographic = web_mercator_to_geographic(MapPoint::web_mercator(
            EARTH_RADIUS_M * 190f64.to_radians(),
            0.0,
        ));
        assert!((geographic.x - -170.0).abs() < 1e-9);
    }
}
