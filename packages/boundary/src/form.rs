//! Keeps the site location form and the site polygon graphic in step
//! with the capture state.

use uic_inventory_boundary_models::BoundaryCaptureState;
use uic_inventory_boundary_models::map::{Graphic, GraphicLayer};
use uic_inventory_site_models::EsriPolygon;

use crate::view::MapView;

/// A value written into one form field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// The site address text.
    Address(Option<String>),
    /// The site boundary.
    Geometry(Option<EsriPolygon>),
}

/// The persisted half of the capture state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteLocationValues {
    /// Site address.
    pub address: Option<String>,
    /// Site boundary.
    pub geometry: Option<EsriPolygon>,
}

/// An externally owned form container.
pub trait FormState {
    /// Writes a field, marking the form dirty when `should_dirty` is set
    /// and the value differs from the defaults.
    fn set_value(&mut self, value: FieldValue, should_dirty: bool);

    /// Replaces both the values and the defaults; the form is clean
    /// afterwards.
    fn reset(&mut self, values: SiteLocationValues);

    /// Current values.
    fn values(&self) -> SiteLocationValues;

    /// Whether the values differ from what was last reset.
    fn is_dirty(&self) -> bool;
}

/// In-memory [`FormState`]: dirty iff a dirtying write left the values
/// different from the defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteLocationForm {
    values: SiteLocationValues,
    defaults: SiteLocationValues,
    touched: bool,
}

impl SiteLocationForm {
    /// Creates an empty, clean form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl FormState for SiteLocationForm {
    fn set_value(&mut self, value: FieldValue, should_dirty: bool) {
        match value {
            FieldValue::Address(address) => self.values.address = address,
            FieldValue::Geometry(geometry) => self.values.geometry = geometry,
        }
        self.touched |= should_dirty;
    }

    fn reset(&mut self, values: SiteLocationValues) {
        self.defaults = values.clone();
        self.values = values;
        self.touched = false;
    }

    fn values(&self) -> SiteLocationValues {
        self.values.clone()
    }

    fn is_dirty(&self) -> bool {
        self.touched && self.values != self.defaults
    }
}

/// Pushes whatever changed between `previous` and `next` into the form
/// and the map.
pub fn sync_form<V: MapView, F: FormState>(
    previous: &BoundaryCaptureState,
    next: &BoundaryCaptureState,
    view: &mut V,
    form: &mut F,
) {
    if previous.geometry != next.geometry {
        log::trace!("Syncing site boundary to form");
        view.set_graphic(
            GraphicLayer::SitePolygon,
            next.geometry.clone().map(Graphic::boundary),
        );
        form.set_value(FieldValue::Geometry(next.geometry.clone()), true);
    }

    if previous.address != next.address {
        log::trace!("Syncing site address to form");
        form.set_value(FieldValue::Address(next.address.clone()), true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::testing::RecordingView;
    use uic_inventory_site_models::SpatialReference;

    fn square() -> EsriPolygon {
        EsriPolygon::new(
            vec![vec![[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]]],
            SpatialReference::WEB_MERCATOR,
        )
    }

    #[test]
    fn reset_leaves_form_clean() {
        let mut form = SiteLocationForm::new();
        form.reset(SiteLocationValues {
            address: Some("123 Main St".to_string()),
            geometry: Some(square()),
        });

        assert!(!form.is_dirty());
        assert_eq!(form.values().address.as_deref(), Some("123 Main St"));
    }

    #[test]
    fn writing_back_the_default_is_not_dirty() {
        let mut form = SiteLocationForm::new();
        form.reset(SiteLocationValues {
            address: Some("a".to_string()),
            geometry: None,
        });

        form.set_value(FieldValue::Address(Some("b".to_string())), true);
        assert!(form.is_dirty());

        form.set_value(FieldValue::Address(Some("a".to_string())), true);
        assert!(!form.is_dirty());
    }

    #[test]
    fn non_dirtying_write_stays_clean() {
        let mut form = SiteLocationForm::new();
        form.set_value(FieldValue::Address(Some("b".to_string())), false);
        assert!(!form.is_dirty());
    }

    #[test]
    fn changed_geometry_reaches_form_and_map() {
        let mut view = RecordingView::default();
        let mut form = SiteLocationForm::new();
        let previous = BoundaryCaptureState::default();
        let next = BoundaryCaptureState {
            geometry: Some(square()),
            ..BoundaryCaptureState::default()
        };

        sync_form(&previous, &next, &mut view, &mut form);

        assert_eq!(form.values().geometry, Some(square()));
        assert!(form.is_dirty());
        assert_eq!(
            view.graphics.get(&GraphicLayer::SitePolygon),
            Some(&Graphic::boundary(square()))
        );

        sync_form(&next, &previous, &mut view, &mut form);
        assert!(!view.graphics.contains_key(&GraphicLayer::SitePolygon));
        assert!(form.values().geometry.is_none());
    }

    #[test]
    fn unchanged_state_touches_nothing() {
        let mut view = RecordingView::default();
        let mut form = SiteLocationForm::new();
        let state = BoundaryCaptureState {
            address: Some("x".to_string()),
            ..BoundaryCaptureState::default()
        };

        sync_form(&state, &state.clone(), &mut view, &mut form);
        assert!(form.values().address.is_none());
        assert!(view.graphics.is_empty());
    }
}
