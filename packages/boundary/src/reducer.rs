//! Pure state transitions for boundary capture.

use uic_inventory_boundary_models::{
    Action, ActiveTool, BoundaryCaptureState, BoundarySource, FormStatus, ParcelChange,
};

use crate::projection::format_address;

/// Computes the state that follows `action`.
///
/// Never fails. Activating a boundary tool does not clear the geometry
/// here; the session dispatches that follow-up itself.
#[must_use]
pub fn reduce(mut state: BoundaryCaptureState, action: Action) -> BoundaryCaptureState {
    match action {
        Action::InitialLoad { geometry, address } => {
            if let Some(geometry) = geometry {
                state.geometry = Some(geometry);
            }
            if let Some(address) = address {
                state.address = Some(address);
            }
        }
        Action::GeocodeSuccess { address } => {
            state.address = Some(address);
            state.form_status = FormStatus::AwaitingBoundary;
        }
        Action::SkipGeocoding => {
            state.form_status = FormStatus::AwaitingAddressClick;
        }
        Action::ActivateSiteAddressFromClick => toggle(&mut state, ActiveTool::AddressByClick),
        Action::AddressClicked { point } => {
            state.address = Some(format_address(point));
            state.form_status = FormStatus::AwaitingBoundary;
        }
        Action::SelectSiteFromParcel => toggle(&mut state, ActiveTool::ParcelSelect),
        Action::DrawSiteBoundary => toggle(&mut state, ActiveTool::FreehandDraw),
        Action::SetSiteBoundary { geometry, source } => {
            match source {
                BoundarySource::Cleared => {}
                BoundarySource::Parcel { id, change } => match change {
                    ParcelChange::Added => {
                        state.selected_parcel_ids.insert(id);
                    }
                    ParcelChange::Removed => {
                        state.selected_parcel_ids.remove(&id);
                    }
                },
                // drawing is one-shot
                BoundarySource::Freehand => state.active_tool = None,
            }

            if geometry.is_none() {
                state.selected_parcel_ids.clear();
            }
            state.geometry = geometry;
        }
    }

    state
}

fn toggle(state: &mut BoundaryCaptureState, tool: ActiveTool) {
    state.active_tool = if state.active_tool == Some(tool) {
        None
    } else {
        Some(tool)
    };
}
