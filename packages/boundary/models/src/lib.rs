#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Site boundary capture state and actions.
//!
//! A site's location is captured as an address (geocoded or clicked) plus
//! a boundary polygon (built from parcels or drawn freehand). The state
//! here is transient: it is hydrated from the stored site, changed only by
//! dispatching an [`Action`], and only its `address`/`geometry` pair is
//! ever saved.

pub mod map;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use uic_inventory_site_models::{EsriPolygon, MapPoint};

/// The map tool currently accepting input. At most one is active.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ActiveTool {
    /// Clicking the map sets the site address to the clicked coordinate.
    #[serde(rename = "site-address-click")]
    #[strum(serialize = "site-address-click")]
    AddressByClick,
    /// Clicking parcels adds them to, or removes them from, the boundary.
    #[serde(rename = "selecting-a-parcel")]
    #[strum(serialize = "selecting-a-parcel")]
    ParcelSelect,
    /// Drawing a polygon on the map sets the boundary.
    #[serde(rename = "freehand-polygon-drawing")]
    #[strum(serialize = "freehand-polygon-drawing")]
    FreehandDraw,
}

impl ActiveTool {
    /// Tools that build a boundary; activating one starts from no geometry.
    #[must_use]
    pub const fn builds_boundary(self) -> bool {
        matches!(self, Self::ParcelSelect | Self::FreehandDraw)
    }
}

/// Which guided step of the location form to present next.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum FormStatus {
    /// Nothing has been geocoded or skipped yet.
    #[default]
    Undetermined,
    /// Geocoding was skipped; the user must click the site point.
    #[serde(rename = "allow-site-address-from-click")]
    #[strum(serialize = "allow-site-address-from-click")]
    AwaitingAddressClick,
    /// An address is known; the user must select or draw the boundary.
    #[serde(rename = "allow-site-boundary-from-click")]
    #[strum(serialize = "allow-site-boundary-from-click")]
    AwaitingBoundary,
}

/// Identifier of a parcel in the external parcel layer (its `OBJECTID`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ParcelId(pub i64);

impl std::fmt::Display for ParcelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A parcel returned by a hit-test against the parcel layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParcelFeature {
    /// Parcel identifier.
    pub id: ParcelId,
    /// Parcel outline.
    pub geometry: EsriPolygon,
}

/// Whether a parcel click added or removed the parcel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParcelChange {
    /// The parcel was unioned into the boundary.
    Added,
    /// The parcel was subtracted from the boundary.
    Removed,
}

/// What produced a new boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum BoundarySource {
    /// The boundary was reset, e.g. when a boundary tool was activated.
    Cleared,
    /// A parcel click changed the running union.
    Parcel {
        /// The clicked parcel.
        id: ParcelId,
        /// Whether it was added or removed.
        change: ParcelChange,
    },
    /// A freehand drawing was completed.
    Freehand,
}

/// Every transition the boundary capture state accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Action {
    /// Stored site data finished loading.
    InitialLoad {
        /// Stored boundary, if any.
        geometry: Option<EsriPolygon>,
        /// Stored address, if any.
        address: Option<String>,
    },
    /// The geocoder matched the entered address.
    GeocodeSuccess {
        /// Matched address.
        address: String,
    },
    /// The user skipped geocoding, or it found nothing.
    SkipGeocoding,
    /// Toggle the address-by-click tool.
    ActivateSiteAddressFromClick,
    /// The map was clicked while the address-by-click tool was active.
    AddressClicked {
        /// Clicked location.
        point: MapPoint,
    },
    /// Toggle the parcel selection tool.
    SelectSiteFromParcel,
    /// Toggle the freehand drawing tool.
    DrawSiteBoundary,
    /// Replace the boundary.
    SetSiteBoundary {
        /// New boundary; `None` clears it.
        geometry: Option<EsriPolygon>,
        /// What produced it.
        source: BoundarySource,
    },
}

impl Action {
    /// The clearing action dispatched when a boundary tool is activated.
    #[must_use]
    pub const fn clear_boundary() -> Self {
        Self::SetSiteBoundary {
            geometry: None,
            source: BoundarySource::Cleared,
        }
    }
}

/// Transient state of one site location editing session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryCaptureState {
    /// Site address or `"lon, lat"` text.
    pub address: Option<String>,
    /// Site boundary.
    pub geometry: Option<EsriPolygon>,
    /// Tool currently accepting map input.
    pub active_tool: Option<ActiveTool>,
    /// Next guided step.
    pub form_status: FormStatus,
    /// Parcels unioned into `geometry` by the parcel selection tool.
    pub selected_parcel_ids: BTreeSet<ParcelId>,
}

impl BoundaryCaptureState {
    /// Whether `tool` is the active tool.
    #[must_use]
    pub fn is_active(&self, tool: ActiveTool) -> bool {
        self.active_tool == Some(tool)
    }

    /// Whether the parcel is part of the current boundary.
    #[must_use]
    pub fn is_parcel_selected(&self, id: ParcelId) -> bool {
        self.selected_parcel_ids.contains(&id)
    }

    /// Whether the boundary tools should be offered: an address is known
    /// or the form has moved on to the boundary step.
    #[must_use]
    pub const fn boundary_step_available(&self) -> bool {
        self.address.is_some() || matches!(self.form_status, FormStatus::AwaitingBoundary)
    }

    /// Whether the address-by-click tool should be offered.
    #[must_use]
    pub const fn address_click_available(&self) -> bool {
        matches!(self.form_status, FormStatus::AwaitingAddressClick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr as _;
    use uic_inventory_site_models::SpatialReference;

    #[test]
    fn tool_names_round_trip_through_strum() {
        assert_eq!(ActiveTool::ParcelSelect.to_string(), "selecting-a-parcel");
        assert_eq!(
            ActiveTool::from_str("freehand-polygon-drawing").unwrap(),
            ActiveTool::FreehandDraw
        );
        assert_eq!(ActiveTool::AddressByClick.as_ref(), "site-address-click");
    }

    #[test]
    fn only_boundary_tools_build_boundaries() {
        assert!(!ActiveTool::AddressByClick.builds_boundary());
        assert!(ActiveTool::ParcelSelect.builds_boundary());
        assert!(ActiveTool::FreehandDraw.builds_boundary());
    }

    #[test]
    fn default_state_is_empty() {
        let state = BoundaryCaptureState::default();
        assert!(state.address.is_none());
        assert!(state.geometry.is_none());
        assert!(state.active_tool.is_none());
        assert_eq!(state.form_status, FormStatus::Undetermined);
        assert!(!state.boundary_step_available());
        assert!(!state.address_click_available());
    }

    #[test]
    fn actions_are_tagged_by_type() {
        let action = Action::SetSiteBoundary {
            geometry: Some(EsriPolygon::new(Vec::new(), SpatialReference::WEB_MERCATOR)),
            source: BoundarySource::Parcel {
                id: ParcelId(12),
                change: ParcelChange::Added,
            },
        };

        let value = serde_json::to_value(&action).unwrap();
        assert_eq!(value["type"], "set-site-boundary");
        assert_eq!(value["source"]["type"], "parcel");
        assert_eq!(value["source"]["id"], 12);
        assert_eq!(value["source"]["change"], "added");

        let value = serde_json::to_value(Action::SkipGeocoding).unwrap();
        assert_eq!(value, serde_json::json!({ "type": "skip-geocoding" }));
    }

    #[test]
    fn form_status_uses_guided_step_names() {
        let value = serde_json::to_value(FormStatus::AwaitingBoundary).unwrap();
        assert_eq!(value, "allow-site-boundary-from-click");
    }
}
