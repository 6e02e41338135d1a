//! One site location editing session.
//!
//! [`BoundaryCaptureSession`] owns the capture state together with the
//! map view and the form it drives. Every change goes through
//! [`BoundaryCaptureSession::dispatch`], which reduces the action, clears
//! the boundary when a boundary tool is switched on, re-attaches the map
//! subscription for the active tool, and syncs the form and graphics.

use uic_inventory_boundary_models::map::{
    Graphic, GraphicLayer, HitTestRequest, MapEvent, SubscriptionId, Viewpoint,
};
use uic_inventory_boundary_models::{Action, ActiveTool, BoundaryCaptureState, ParcelFeature};
use uic_inventory_geocoder::{GeocodeMatch, Geocoder};
use uic_inventory_site::{SiteClient, ValidationError, parse_site_geometry, validate_site_location};
use uic_inventory_site_models::{Site, SiteLocationInput};

use crate::BoundaryError;
use crate::adapters::{AdapterOutcome, ToolAdapters, parcel_hit};
use crate::form::{FormState, SiteLocationValues, sync_form};
use crate::geometry::{GeometryError, extent};
use crate::reducer::reduce;
use crate::view::MapView;

/// Scale the map zooms to on a geocode match.
pub const GEOCODE_ZOOM_SCALE: f64 = 1_500.0;

/// How much a stored boundary's extent is enlarged when the site loads.
pub const LOAD_EXTENT_FACTOR: f64 = 3.0;

/// A site location editing session over a map view and a form.
#[derive(Debug)]
pub struct BoundaryCaptureSession<V: MapView, F: FormState> {
    state: BoundaryCaptureState,
    adapters: ToolAdapters,
    view: V,
    form: F,
}

impl<V: MapView, F: FormState> BoundaryCaptureSession<V, F> {
    /// Starts an empty session. Nothing is subscribed until a tool is
    /// activated.
    pub fn new(view: V, form: F) -> Self {
        Self {
            state: BoundaryCaptureState::default(),
            adapters: ToolAdapters::new(),
            view,
            form,
        }
    }

    /// Current capture state.
    pub const fn state(&self) -> &BoundaryCaptureState {
        &self.state
    }

    /// The map view.
    pub const fn view(&self) -> &V {
        &self.view
    }

    /// The map view, for host-side updates such as scale changes.
    pub const fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// The form.
    pub const fn form(&self) -> &F {
        &self.form
    }

    /// Closes the session and hands back its parts.
    pub fn into_parts(mut self) -> (BoundaryCaptureState, V, F) {
        self.close();
        (self.state, self.view, self.form)
    }

    /// Loads a stored site into the session.
    ///
    /// Anything from an earlier site is discarded: the active tool is
    /// detached, session graphics are removed, and the state starts over.
    /// The form is reset to the stored values first, so the loaded site
    /// does not count as an edit.
    ///
    /// # Errors
    ///
    /// Returns [`BoundaryError::Site`] if the stored geometry is not a
    /// valid polygon.
    pub fn hydrate(&mut self, site: &Site) -> Result<(), BoundaryError> {
        let geometry = parse_site_geometry(site)?;
        log::debug!(
            "Hydrating site {} (address: {}, boundary: {})",
            site.id,
            site.address.is_some(),
            geometry.is_some()
        );

        self.close();
        self.state = BoundaryCaptureState::default();
        self.form.reset(SiteLocationValues {
            address: site.address.clone(),
            geometry: geometry.clone(),
        });

        let target = geometry.as_ref().and_then(extent);
        self.dispatch(Action::InitialLoad {
            geometry,
            address: site.address.clone(),
        });

        if let Some(extent) = target {
            self.view.go_to(Viewpoint::Extent {
                extent: extent.expand(LOAD_EXTENT_FACTOR),
            });
        }

        Ok(())
    }

    /// Applies an action and brings the map and form up to date.
    pub fn dispatch(&mut self, action: Action) {
        log::trace!("Dispatching {action:?}");

        let previous = std::mem::take(&mut self.state);
        let mut next = reduce(previous.clone(), action);

        if next.active_tool != previous.active_tool
            && next.active_tool.is_some_and(ActiveTool::builds_boundary)
        {
            next = reduce(next, Action::clear_boundary());
        }

        self.adapters.reconcile(&mut self.view, next.active_tool);
        sync_form(&previous, &next, &mut self.view, &mut self.form);
        self.state = next;
    }

    /// Applies the outcome of geocoding the entered address.
    ///
    /// A match pins and zooms to the location; no match moves the form
    /// on to picking the site point on the map.
    pub fn geocode_result(&mut self, result: Option<GeocodeMatch>) {
        let Some(found) = result else {
            self.dispatch(Action::SkipGeocoding);
            return;
        };

        self.view
            .set_graphic(GraphicLayer::SitePoint, Some(Graphic::pin(found.location)));
        self.view.go_to(Viewpoint::Point {
            point: found.location,
            scale: GEOCODE_ZOOM_SCALE,
        });
        self.dispatch(Action::GeocodeSuccess {
            address: found.address,
        });
    }

    /// Geocodes `street` in `zone` and applies the result. Failures are
    /// logged and treated as no match.
    pub async fn geocode<G: Geocoder + ?Sized>(&mut self, geocoder: &G, street: &str, zone: &str) {
        let result = match geocoder.geocode(street, zone).await {
            Ok(result) => result,
            Err(e) => {
                log::warn!("Geocoding '{street}, {zone}' failed: {e}");
                None
            }
        };

        if result.is_none() {
            log::info!("No geocode match for '{street}, {zone}'");
        }
        self.geocode_result(result);
    }

    /// Routes a map event to the tool that subscribed for it.
    ///
    /// Returns a hit-test the host must run when the parcel tool was
    /// clicked; pass its result to [`Self::handle_hit_test`].
    pub fn handle_map_event(
        &mut self,
        subscription: SubscriptionId,
        event: MapEvent,
    ) -> Option<HitTestRequest> {
        match self
            .adapters
            .handle_event(&mut self.view, subscription, event)
        {
            AdapterOutcome::Dispatch(action) => {
                self.dispatch(action);
                None
            }
            AdapterOutcome::HitTest(request) => Some(request),
            AdapterOutcome::Ignored => None,
        }
    }

    /// Applies the parcels found by a hit-test.
    ///
    /// Results for a subscription that has since been torn down are
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError`] if the parcel cannot be combined with the
    /// current boundary; the state is left unchanged.
    pub fn handle_hit_test(
        &mut self,
        request: &HitTestRequest,
        features: &[ParcelFeature],
    ) -> Result<(), GeometryError> {
        if !self.adapters.is_live(request.subscription) {
            log::warn!(
                "Dropping hit-test result for stale subscription {}",
                request.subscription.0
            );
            return Ok(());
        }

        if let Some(action) = parcel_hit(&self.state, features)? {
            self.dispatch(action);
        }
        Ok(())
    }

    /// Builds the location update to save, or `None` if the form has no
    /// unsaved changes.
    ///
    /// # Errors
    ///
    /// Returns [`BoundaryError::Validation`] if the address or boundary is
    /// missing.
    pub fn submission(
        &self,
        account_id: i64,
        site_id: i64,
    ) -> Result<Option<SiteLocationInput>, BoundaryError> {
        if !self.form.is_dirty() {
            return Ok(None);
        }

        let values = self.form.values();
        validate_site_location(values.address.as_deref(), values.geometry.as_ref())?;

        let Some(address) = values.address else {
            return Err(ValidationError::MissingAddress.into());
        };
        let Some(geometry) = values.geometry else {
            return Err(ValidationError::MissingGeometry.into());
        };

        Ok(Some(SiteLocationInput {
            id: account_id,
            site_id,
            address,
            geometry: serde_json::to_string(&geometry)?,
        }))
    }

    /// Saves unsaved changes. Returns whether anything was sent.
    ///
    /// On failure the form keeps its values so the user can retry.
    ///
    /// # Errors
    ///
    /// Returns [`BoundaryError`] if validation fails or the API rejects
    /// the update.
    pub async fn submit(
        &mut self,
        client: &SiteClient,
        account_id: i64,
        site_id: i64,
    ) -> Result<bool, BoundaryError> {
        let Some(input) = self.submission(account_id, site_id)? else {
            log::debug!("Site {site_id} location unchanged; nothing to save");
            return Ok(false);
        };

        client.update_location(&input).await?;
        self.form.reset(self.form.values());
        log::info!("Saved site {site_id} location");
        Ok(true)
    }

    /// Detaches from the map and removes session graphics.
    pub fn close(&mut self) {
        self.adapters.teardown(&mut self.view);
        for layer in [
            GraphicLayer::SitePoint,
            GraphicLayer::SitePolygon,
            GraphicLayer::Drawing,
        ] {
            self.view.set_graphic(layer, None);
        }
    }
}
