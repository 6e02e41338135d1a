//! A map view with no screen, for driving a capture session from the
//! command line.

use uic_inventory_boundary::MapView;
use uic_inventory_boundary_models::map::{
    Graphic, GraphicLayer, SubscriptionId, SubscriptionKind, Viewpoint,
};
use uic_inventory_site_models::SpatialReference;

/// Parcel layer id reported to hit-tests.
pub const PARCEL_LAYER_ID: &str = "parcels";

/// Scale the headless map pretends to be at.
const DEFAULT_SCALE: f64 = 2_257.0;

/// Tracks the one live subscription and logs everything else.
#[derive(Debug)]
pub struct HeadlessView {
    next_id: u64,
    live: Option<SubscriptionId>,
    scale: f64,
}

impl HeadlessView {
    /// Creates a view with nothing subscribed.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next_id: 0,
            live: None,
            scale: DEFAULT_SCALE,
        }
    }

    /// The subscription events should be delivered to.
    pub const fn live(&self) -> Option<SubscriptionId> {
        self.live
    }
}

impl MapView for HeadlessView {
    fn subscribe(&mut self, kind: SubscriptionKind) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        log::debug!("subscribe {kind:?} -> {}", id.0);
        self.live = Some(id);
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        log::debug!("unsubscribe {}", id.0);
        if self.live == Some(id) {
            self.live = None;
        }
    }

    fn focus(&mut self) {}

    fn scale(&self) -> f64 {
        self.scale
    }

    fn go_to(&mut self, viewpoint: Viewpoint) {
        log::debug!("go to {viewpoint:?}");
        if let Viewpoint::Point { scale, .. } = viewpoint {
            self.scale = scale;
        }
    }

    fn spatial_reference(&self) -> SpatialReference {
        SpatialReference::WEB_MERCATOR
    }

    fn set_graphic(&mut self, layer: GraphicLayer, graphic: Option<Graphic>) {
        log::trace!("{layer:?} <- {graphic:?}");
    }

    fn parcel_layer_id(&self) -> String {
        PARCEL_LAYER_ID.to_string()
    }
}
