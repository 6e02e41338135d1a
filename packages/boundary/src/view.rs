//! The map surface the capture session drives.
//!
//! The view is owned by the host (a web map, a test double) and handed to
//! the session explicitly. Event delivery is the host's job: it calls back
//! into the session with the [`SubscriptionId`] it returned from
//! [`MapView::subscribe`].

use uic_inventory_boundary_models::map::{
    Graphic, GraphicLayer, SubscriptionId, SubscriptionKind, Viewpoint,
};
use uic_inventory_site_models::SpatialReference;

/// Operations the capture workflow needs from a map.
pub trait MapView {
    /// Starts delivering events of `kind`.
    fn subscribe(&mut self, kind: SubscriptionKind) -> SubscriptionId;

    /// Stops delivering events for `id`. Unknown ids are ignored.
    fn unsubscribe(&mut self, id: SubscriptionId);

    /// Gives the map keyboard focus.
    fn focus(&mut self);

    /// Current scale denominator.
    fn scale(&self) -> f64;

    /// Moves the map.
    fn go_to(&mut self, viewpoint: Viewpoint);

    /// Spatial reference of map coordinates.
    fn spatial_reference(&self) -> SpatialReference;

    /// Replaces the graphic in `layer`; `None` removes it.
    fn set_graphic(&mut self, layer: GraphicLayer, graphic: Option<Graphic>);

    /// Identifier of the parcel layer used for hit-tests.
    fn parcel_layer_id(&self) -> String;
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::BTreeMap;

    use super::*;

    /// In-memory map that records what the session asked of it.
    #[derive(Debug, Default)]
    pub struct RecordingView {
        pub next_id: u64,
        pub live: BTreeMap<SubscriptionId, SubscriptionKind>,
        pub subscribe_log: Vec<SubscriptionKind>,
        pub unsubscribe_log: Vec<SubscriptionId>,
        pub graphics: BTreeMap<GraphicLayer, Graphic>,
        pub viewpoints: Vec<Viewpoint>,
        pub focus_count: usize,
        pub scale: f64,
    }

    impl RecordingView {
        pub fn at_scale(scale: f64) -> Self {
            Self {
                scale,
                ..Self::default()
            }
        }

        pub fn only_live(&self) -> Option<(SubscriptionId, SubscriptionKind)> {
            assert!(self.live.len() <= 1, "more than one live subscription");
            self.live.iter().next().map(|(id, kind)| (*id, *kind))
        }
    }

    impl MapView for RecordingView {
        fn subscribe(&mut self, kind: SubscriptionKind) -> SubscriptionId {
            self.next_id += 1;
            let id = SubscriptionId(self.next_id);
            self.live.insert(id, kind);
            self.subscribe_log.push(kind);
            id
        }

        fn unsubscribe(&mut self, id: SubscriptionId) {
            self.live.remove(&id);
            self.unsubscribe_log.push(id);
        }

        fn focus(&mut self) {
            self.focus_count += 1;
        }

        fn scale(&self) -> f64 {
            self.scale
        }

        fn go_to(&mut self, viewpoint: Viewpoint) {
            self.viewpoints.push(viewpoint);
        }

        fn spatial_reference(&self) -> SpatialReference {
            SpatialReference::WEB_MERCATOR
        }

        fn set_graphic(&mut self, layer: GraphicLayer, graphic: Option<Graphic>) {
            match graphic {
                Some(graphic) => {
                    self.graphics.insert(layer, graphic);
                }
                None => {
                    self.graphics.remove(&layer);
                }
            }
        }

        fn parcel_layer_id(&self) -> String {
            "parcels".to_string()
        }
    }
}
