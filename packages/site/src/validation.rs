//! Validation of the site location form before it is submitted.

use thiserror::Error;
use uic_inventory_site_models::EsriPolygon;

/// A required site location field is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No address was geocoded or clicked.
    #[error("A site address or point is required")]
    MissingAddress,

    /// No boundary was selected or drawn.
    #[error("A site boundary is required")]
    MissingGeometry,
}

/// Checks that both halves of a site location are present.
///
/// # Errors
///
/// Returns the first missing field, address before geometry.
pub fn validate_site_location(
    address: Option<&str>,
    geometry: Option<&EsriPolygon>,
) -> Result<(), ValidationError> {
    if address.is_none_or(|a| a.trim().is_empty()) {
        return Err(ValidationError::MissingAddress);
    }

    if geometry.is_none_or(EsriPolygon::is_empty) {
        return Err(ValidationError::MissingGeometry);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uic_inventory_site_models::SpatialReference;

    fn square() -> EsriPolygon {
        EsriPolygon::new(
            vec![vec![[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]]],
            SpatialReference::WEB_MERCATOR,
        )
    }

    #[test]
    fn accepts_complete_location() {
        assert_eq!(validate_site_location(Some("123 Main St"), Some(&square())), Ok(()));
    }

    #[test]
    fn requires_address() {
        assert_eq!(
            validate_site_location(None, Some(&square())),
            Err(ValidationError::MissingAddress)
        );
        assert_eq!(
            validate_site_location(Some("   "), Some(&square())),
            Err(ValidationError::MissingAddress)
        );
    }

    #[test]
    fn requires_non_empty_geometry() {
        assert_eq!(
            validate_site_location(Some("-111.9, 40.7"), None),
            Err(ValidationError::MissingGeometry)
        );

        let empty = EsriPolygon::new(Vec::new(), SpatialReference::WEB_MERCATOR);
        assert_eq!(
            validate_site_location(Some("-111.9, 40.7"), Some(&empty)),
            Err(ValidationError::MissingGeometry)
        );
    }
}
