//! Interactive map session.
//!
//! [`MapSession`] owns everything that changes while a user explores the
//! map: the active hazard layer, the single live popup, the distance
//! measurement and the reachable-area radius. Event handlers receive the
//! session and the [`MapHost`] explicitly.
//!
//! Hazard lookups are split in two so the tile fetch can be awaited without
//! holding the session: [`MapSession::handle_click`] returns a
//! [`PendingLookup`], and [`MapSession::finish_lookup`] applies its result.
//! Starting a new lookup or selecting another hazard cancels the previous
//! one, so popups can never appear out of order.

mod lookup;

pub use lookup::{ClickOutcome, HoverTarget, LookupOutcome, PendingLookup};

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::legend::{closest, render, GuideColor, HazardLegendCatalog, Rgba};
use crate::map::{Cursor, MapEvent, MapHost, PopupHandle, PopupSpec};
use crate::measure::{self, DistanceSession, ReachableAreaConfig};
use crate::shelter::ShelterCatalog;
use crate::tile::{SampleError, SamplePlan, SamplerConfig};

/// Popup anchor offset for shelter popups.
const SHELTER_POPUP_OFFSET: (i32, i32) = (0, -15);

/// Popup anchor offset for hazard popups, clearing the marker.
const HAZARD_POPUP_OFFSET: (i32, i32) = (0, -45);

pub struct MapSession {
    shelters: Arc<ShelterCatalog>,
    legends: HazardLegendCatalog,
    sampler_config: SamplerConfig,
    reachable_config: ReachableAreaConfig,
    active_hazard: Option<String>,
    popup: Option<PopupHandle>,
    distance: DistanceSession,
    generation: u64,
    pending: Option<CancellationToken>,
    reachable_radius: u32,
}

impl MapSession {
    pub fn new(shelters: Arc<ShelterCatalog>, legends: HazardLegendCatalog) -> Self {
        Self {
            shelters,
            legends,
            sampler_config: SamplerConfig::default(),
            reachable_config: ReachableAreaConfig::default(),
            active_hazard: None,
            popup: None,
            distance: DistanceSession::new(),
            generation: 0,
            pending: None,
            reachable_radius: 0,
        }
    }

    pub fn with_sampler_config(mut self, config: SamplerConfig) -> Self {
        self.sampler_config = config;
        self
    }

    pub fn with_reachable_config(mut self, config: ReachableAreaConfig) -> Self {
        self.reachable_config = config;
        self
    }

    pub fn active_hazard(&self) -> Option<&str> {
        self.active_hazard.as_deref()
    }

    pub fn popup(&self) -> Option<PopupHandle> {
        self.popup
    }

    pub fn distance(&self) -> &DistanceSession {
        &self.distance
    }

    pub fn reachable_radius(&self) -> u32 {
        self.reachable_radius
    }

    pub fn legends(&self) -> &HazardLegendCatalog {
        &self.legends
    }

    /// Makes `layer_id` the hazard layer that clicks are looked up against.
    ///
    /// Closes the live popup and supersedes any pending lookup. Returns the
    /// layer's legend entries, or `None` if it has no legend.
    pub fn select_hazard<H: MapHost + ?Sized>(&mut self, host: &mut H, layer_id: &str) -> Option<&[GuideColor]> {
        debug!(layer = layer_id, "Active hazard layer changed");
        self.active_hazard = Some(layer_id.to_string());
        self.cancel_pending();
        self.close_popup(host);

        let entries = self.legends.legend_entries(layer_id);
        if entries.is_none() {
            warn!(layer = layer_id, "No legend for hazard layer");
        }
        entries
    }

    /// Legend panel HTML for the active hazard layer.
    pub fn legend_panel_html(&self) -> Option<String> {
        let layer = self.active_hazard.as_deref()?;
        self.legends.legend_entries(layer).map(render::legend_panel_html)
    }

    /// Handles a primary click.
    ///
    /// Clears the distance measurement. A shelter under the pointer gets its
    /// popup; anywhere else starts a hazard lookup on the active layer.
    pub fn handle_click<H: MapHost + ?Sized>(&mut self, host: &mut H, event: MapEvent) -> ClickOutcome {
        self.distance.clear();
        host.set_measurement(&self.distance.overlay());
        host.set_cursor(Cursor::Default);

        if let Some(id) = host.shelter_at(event.point) {
            let Some(record) = self.shelters.get(&id) else {
                warn!(id = %id, "Clicked shelter is not in the catalog");
                return ClickOutcome::Nothing;
            };
            let spec = PopupSpec {
                position: record.location,
                html: render::shelter_popup_html(record),
                offset: SHELTER_POPUP_OFFSET,
                marker: false,
            };
            self.cancel_pending();
            self.show_popup(host, spec);
            return ClickOutcome::Shelter(id);
        }

        self.begin_lookup(host, event)
    }

    fn begin_lookup<H: MapHost + ?Sized>(&mut self, host: &mut H, event: MapEvent) -> ClickOutcome {
        self.cancel_pending();

        let Some(layer_id) = self.active_hazard.clone() else {
            return ClickOutcome::Nothing;
        };
        let Some(template) = host.raster_tile_template(&layer_id) else {
            warn!(layer = %layer_id, "Hazard layer has no raster tile source");
            return ClickOutcome::Nothing;
        };

        let plan = match SamplePlan::new(&template, event.lng_lat, host.zoom(), &self.sampler_config) {
            Ok(plan) => plan,
            Err(e) => {
                debug!(error = %e, "Click outside sampleable area");
                return ClickOutcome::Nothing;
            }
        };

        let cancel = CancellationToken::new();
        self.pending = Some(cancel.clone());
        debug!(layer = %layer_id, url = %plan.url, generation = self.generation, "Hazard lookup started");

        ClickOutcome::Lookup(PendingLookup {
            layer_id,
            position: event.lng_lat,
            plan,
            generation: self.generation,
            cancel,
        })
    }

    /// Applies the pixel sample of a lookup.
    ///
    /// Superseded lookups are dropped. A transparent pixel or a layer
    /// without legend opens nothing.
    pub fn finish_lookup<H: MapHost + ?Sized>(
        &mut self,
        host: &mut H,
        lookup: PendingLookup,
        result: Result<Rgba, SampleError>,
    ) -> LookupOutcome {
        if lookup.generation != self.generation || lookup.is_cancelled() {
            return LookupOutcome::Superseded;
        }
        self.pending = None;

        let sample = match result {
            Ok(sample) => sample,
            Err(SampleError::Cancelled) => return LookupOutcome::Superseded,
            Err(e) => {
                warn!(layer = %lookup.layer_id, url = %lookup.plan.url, error = %e, "Hazard lookup failed");
                return LookupOutcome::Failed(e);
            }
        };

        if sample.is_transparent() {
            return LookupOutcome::NoData;
        }

        let Some(legend) = self.legends.get(&lookup.layer_id) else {
            warn!(layer = %lookup.layer_id, "No legend for hazard layer");
            return LookupOutcome::NoLegend;
        };
        let Some(guide) = closest(&sample, &legend.guide_colors) else {
            return LookupOutcome::NoLegend;
        };

        let label = guide.label.clone();
        let spec = PopupSpec {
            position: lookup.position,
            html: render::hazard_popup_html(legend, guide),
            offset: HAZARD_POPUP_OFFSET,
            marker: true,
        };
        self.show_popup(host, spec);
        debug!(layer = %lookup.layer_id, sample = %sample, label = %label, "Hazard lookup shown");

        LookupOutcome::Shown { label }
    }

    /// Handles a secondary click: adds a measurement point, or removes the
    /// point under the pointer.
    pub fn handle_context_menu<H: MapHost + ?Sized>(&mut self, host: &mut H, event: MapEvent) {
        host.set_cursor(Cursor::Crosshair);

        match host.measure_point_at(event.point) {
            Some(id) => {
                self.distance.remove_point(id);
            }
            None => {
                self.distance.add_point(event.lng_lat);
            }
        }
        host.set_measurement(&self.distance.overlay());
    }

    pub fn handle_pointer_enter<H: MapHost + ?Sized>(&mut self, host: &mut H, _target: HoverTarget) {
        host.set_cursor(Cursor::Pointer);
    }

    pub fn handle_pointer_leave<H: MapHost + ?Sized>(&mut self, host: &mut H, target: HoverTarget) {
        let cursor = match target {
            HoverTarget::Shelter => Cursor::Default,
            HoverTarget::MeasurePoint => Cursor::Crosshair,
        };
        host.set_cursor(cursor);
    }

    /// The host closed a popup on its own (close button).
    pub fn handle_popup_closed(&mut self, handle: PopupHandle) {
        if self.popup == Some(handle) {
            self.popup = None;
        }
    }

    /// Sets the reachable-area radius from the slider and redraws.
    ///
    /// Returns the slider label.
    pub fn set_reachable_radius<H: MapHost + ?Sized>(&mut self, host: &mut H, meters: u32) -> String {
        self.reachable_radius = meters;
        if self.reachable_config.is_enabled_at(host.zoom()) {
            self.draw_reachable_area(host);
        }
        measure::reachable_area_label(meters)
    }

    /// Handles the end of a pan or zoom.
    pub fn handle_move_end<H: MapHost + ?Sized>(&mut self, host: &mut H) {
        if !self.reachable_config.is_enabled_at(host.zoom()) {
            host.set_reachable_control_visible(false);
            return;
        }
        host.set_reachable_control_visible(true);
        self.draw_reachable_area(host);
    }

    fn draw_reachable_area<H: MapHost + ?Sized>(&self, host: &mut H) {
        let centers = if self.reachable_radius == 0 {
            Vec::new()
        } else {
            host.rendered_shelter_positions()
        };
        if centers.is_empty() {
            host.set_reachable_area(&geo::MultiPolygon::new(Vec::new()));
            return;
        }
        let area = measure::reachable_area(&centers, f64::from(self.reachable_radius), &self.reachable_config);
        host.set_reachable_area(&area);
    }

    fn show_popup<H: MapHost + ?Sized>(&mut self, host: &mut H, spec: PopupSpec) {
        self.close_popup(host);
        self.popup = Some(host.open_popup(spec));
    }

    fn close_popup<H: MapHost + ?Sized>(&mut self, host: &mut H) {
        if let Some(handle) = self.popup.take() {
            host.close_popup(handle);
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
        self.generation += 1;
    }
}
