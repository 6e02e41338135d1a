//! Translates map gestures into boundary capture actions.
//!
//! Each tool owns one map subscription, attached when the tool becomes
//! active and removed before any other tool attaches its own.

use uic_inventory_boundary_models::map::{
    Graphic, GraphicLayer, HitTestRequest, MapEvent, SubscriptionId, SubscriptionKind, Viewpoint,
};
use uic_inventory_boundary_models::{
    Action, ActiveTool, BoundaryCaptureState, BoundarySource, ParcelFeature,
};
use uic_inventory_site_models::{EsriPolygon, MapPoint, SpatialReference};

use crate::combine::apply_parcel;
use crate::geometry::{GeometryError, to_multi_polygon};
use crate::view::MapView;

/// Clicks made while zoomed out further than this recenter the map.
pub const ADDRESS_ZOOM_THRESHOLD: f64 = 10_489.34;

/// Scale the map zooms to after an address click.
pub const ADDRESS_ZOOM_SCALE: f64 = 10_480.0;

/// What the session should do with an adapted event.
#[derive(Debug, Clone, PartialEq)]
pub enum AdapterOutcome {
    /// Dispatch this action.
    Dispatch(Action),
    /// Ask the host to hit-test the parcel layer.
    HitTest(HitTestRequest),
    /// Nothing to do.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LiveSubscription {
    tool: ActiveTool,
    id: SubscriptionId,
}

/// Keeps exactly one map subscription in step with the active tool.
#[derive(Debug, Default)]
pub struct ToolAdapters {
    live: Option<LiveSubscription>,
}

impl ToolAdapters {
    /// Creates adapters with nothing attached.
    #[must_use]
    pub const fn new() -> Self {
        Self { live: None }
    }

    /// Tool whose subscription is live, if any.
    #[must_use]
    pub fn live_tool(&self) -> Option<ActiveTool> {
        self.live.map(|l| l.tool)
    }

    /// Whether `id` is the live subscription.
    #[must_use]
    pub fn is_live(&self, id: SubscriptionId) -> bool {
        self.live.is_some_and(|l| l.id == id)
    }

    /// Attaches or detaches subscriptions so that only `active` listens.
    pub fn reconcile<V: MapView>(&mut self, view: &mut V, active: Option<ActiveTool>) {
        if self.live_tool() == active {
            return;
        }

        self.teardown(view);

        if let Some(tool) = active {
            view.focus();
            let id = view.subscribe(subscription_kind(tool));
            log::debug!("Attached {tool} to map subscription {}", id.0);
            self.live = Some(LiveSubscription { tool, id });
        }
    }

    /// Removes the live subscription and any in-progress sketch.
    pub fn teardown<V: MapView>(&mut self, view: &mut V) {
        let Some(live) = self.live.take() else {
            return;
        };

        view.unsubscribe(live.id);
        if live.tool == ActiveTool::FreehandDraw {
            view.set_graphic(GraphicLayer::Drawing, None);
        }
        log::debug!("Detached {} from map subscription {}", live.tool, live.id.0);
    }

    /// Adapts one map event for the tool that owns `subscription`.
    ///
    /// Events for a subscription that is no longer live are dropped.
    pub fn handle_event<V: MapView>(
        &self,
        view: &mut V,
        subscription: SubscriptionId,
        event: MapEvent,
    ) -> AdapterOutcome {
        let Some(live) = self.live.filter(|l| l.id == subscription) else {
            log::warn!("Dropping map event for stale subscription {}", subscription.0);
            return AdapterOutcome::Ignored;
        };

        match (live.tool, event) {
            (ActiveTool::AddressByClick, MapEvent::Click { map_point, .. }) => {
                address_clicked(view, map_point)
            }
            (ActiveTool::ParcelSelect, MapEvent::Click { screen_point, .. }) => {
                AdapterOutcome::HitTest(HitTestRequest {
                    subscription,
                    screen_point,
                    layer_id: view.parcel_layer_id(),
                })
            }
            (ActiveTool::FreehandDraw, MapEvent::DrawVertexAdded { vertices }) => {
                let sketch = EsriPolygon::new(vec![vertices], view.spatial_reference());
                view.set_graphic(GraphicLayer::Drawing, Some(Graphic::sketch(sketch)));
                AdapterOutcome::Ignored
            }
            (ActiveTool::FreehandDraw, MapEvent::DrawComplete { vertices }) => {
                view.set_graphic(GraphicLayer::Drawing, None);
                drawing_completed(vertices, view.spatial_reference())
            }
            (tool, event) => {
                log::debug!("{tool} ignores {event:?}");
                AdapterOutcome::Ignored
            }
        }
    }
}

/// Builds the boundary action for a resolved parcel hit-test.
///
/// The first feature wins; an empty hit-test is `Ok(None)`.
///
/// # Errors
///
/// Propagates [`GeometryError`] from combining the parcel with the
/// current boundary.
pub fn parcel_hit(
    state: &BoundaryCaptureState,
    features: &[ParcelFeature],
) -> Result<Option<Action>, GeometryError> {
    let Some(parcel) = features.first() else {
        return Ok(None);
    };

    let combined = apply_parcel(state.geometry.as_ref(), &state.selected_parcel_ids, parcel)?;
    log::debug!("Parcel {} {:?}", parcel.id, combined.change);

    Ok(Some(Action::SetSiteBoundary {
        geometry: combined.geometry,
        source: BoundarySource::Parcel {
            id: parcel.id,
            change: combined.change,
        },
    }))
}

const fn subscription_kind(tool: ActiveTool) -> SubscriptionKind {
    match tool {
        ActiveTool::AddressByClick => SubscriptionKind::ImmediateClick,
        ActiveTool::ParcelSelect => SubscriptionKind::Click {
            suppress_popup: true,
        },
        ActiveTool::FreehandDraw => SubscriptionKind::PolygonDraw,
    }
}

fn address_clicked<V: MapView>(view: &mut V, point: MapPoint) -> AdapterOutcome {
    view.set_graphic(GraphicLayer::SitePoint, Some(Graphic::pin(point)));

    if view.scale() > ADDRESS_ZOOM_THRESHOLD {
        view.go_to(Viewpoint::Point {
            point,
            scale: ADDRESS_ZOOM_SCALE,
        });
    }

    AdapterOutcome::Dispatch(Action::AddressClicked { point })
}

fn drawing_completed(
    mut vertices: Vec<[f64; 2]>,
    spatial_reference: SpatialReference,
) -> AdapterOutcome {
    if vertices.first() != vertices.last() {
        vertices.push(vertices[0]);
    }

    let drawing = EsriPolygon::new(vec![vertices], spatial_reference);
    if drawing.is_empty() {
        log::warn!("Ignoring empty drawing");
        return AdapterOutcome::Ignored;
    }
    if let Err(e) = to_multi_polygon(&drawing) {
        log::warn!("Ignoring drawing: {e}");
        return AdapterOutcome::Ignored;
    }

    AdapterOutcome::Dispatch(Action::SetSiteBoundary {
        geometry: Some(drawing),
        source: BoundarySource::Freehand,
    })
}
