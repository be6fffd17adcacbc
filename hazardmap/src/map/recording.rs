//! In-memory map host.
//!
//! Records every property mutation and overlay update so a session can run
//! headless. Rendered features are placed explicitly at screen positions.

use std::collections::{BTreeMap, HashMap};

use geo::MultiPolygon;

use super::{Cursor, MapHost, PopupHandle, PopupSpec, ScreenPoint, Visibility};
use crate::coord::LngLat;
use crate::measure::MeasureOverlay;
use crate::shelter::ShelterId;
use crate::tile::TileUrlTemplate;

/// Pointer hit tolerance in pixels.
const HIT_TOLERANCE_PX: f64 = 4.0;

/// Last values written to a layer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayerState {
    pub visibility: Option<Visibility>,
    pub opacity: Option<f64>,
}

/// A popup currently open on the host.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPopup {
    pub handle: PopupHandle,
    pub spec: PopupSpec,
}

#[derive(Debug)]
pub struct RecordingHost {
    zoom: f64,
    layers: BTreeMap<String, LayerState>,
    raster_sources: HashMap<String, TileUrlTemplate>,
    shelters: Vec<(ScreenPoint, ShelterId)>,
    measure_points: Vec<(ScreenPoint, u64)>,
    shelter_positions: Vec<LngLat>,
    popups: Vec<RecordedPopup>,
    next_popup: u64,
    measurement: MeasureOverlay,
    reachable_area: MultiPolygon<f64>,
    reachable_control_visible: bool,
    cursor: Cursor,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self {
            zoom: 0.0,
            layers: BTreeMap::new(),
            raster_sources: HashMap::new(),
            shelters: Vec::new(),
            measure_points: Vec::new(),
            shelter_positions: Vec::new(),
            popups: Vec::new(),
            next_popup: 0,
            measurement: MeasureOverlay::default(),
            reachable_area: MultiPolygon::new(Vec::new()),
            reachable_control_visible: false,
            cursor: Cursor::Default,
        }
    }

    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn with_raster_source(mut self, layer_id: impl Into<String>, template: TileUrlTemplate) -> Self {
        self.raster_sources.insert(layer_id.into(), template);
        self
    }

    pub fn with_shelter_positions(mut self, positions: Vec<LngLat>) -> Self {
        self.shelter_positions = positions;
        self
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
    }

    /// Renders a shelter feature at a screen position.
    pub fn place_shelter(&mut self, point: ScreenPoint, id: ShelterId) {
        self.shelters.push((point, id));
    }

    /// Renders a distance-measurement point at a screen position.
    pub fn place_measure_point(&mut self, point: ScreenPoint, id: u64) {
        self.measure_points.push((point, id));
    }

    pub fn layer(&self, layer_id: &str) -> Option<&LayerState> {
        self.layers.get(layer_id)
    }

    pub fn visibility(&self, layer_id: &str) -> Option<Visibility> {
        self.layers.get(layer_id).and_then(|state| state.visibility)
    }

    pub fn opacity(&self, layer_id: &str) -> Option<f64> {
        self.layers.get(layer_id).and_then(|state| state.opacity)
    }

    pub fn open_popups(&self) -> &[RecordedPopup] {
        &self.popups
    }

    pub fn measurement(&self) -> &MeasureOverlay {
        &self.measurement
    }

    pub fn reachable_area(&self) -> &MultiPolygon<f64> {
        &self.reachable_area
    }

    pub fn reachable_control_visible(&self) -> bool {
        self.reachable_control_visible
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self::new()
    }
}

fn hit<T: Clone>(features: &[(ScreenPoint, T)], point: ScreenPoint) -> Option<T> {
    features
        .iter()
        .find(|(at, _)| (at.x - point.x).hypot(at.y - point.y) <= HIT_TOLERANCE_PX)
        .map(|(_, value)| value.clone())
}

impl MapHost for RecordingHost {
    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn set_layer_visibility(&mut self, layer_id: &str, visibility: Visibility) {
        self.layers.entry(layer_id.to_string()).or_default().visibility = Some(visibility);
    }

    fn set_layer_opacity(&mut self, layer_id: &str, opacity: f64) {
        self.layers.entry(layer_id.to_string()).or_default().opacity = Some(opacity);
    }

    fn raster_tile_template(&self, layer_id: &str) -> Option<TileUrlTemplate> {
        self.raster_sources.get(layer_id).cloned()
    }

    fn shelter_at(&self, point: ScreenPoint) -> Option<ShelterId> {
        hit(&self.shelters, point)
    }

    fn measure_point_at(&self, point: ScreenPoint) -> Option<u64> {
        hit(&self.measure_points, point)
    }

    fn rendered_shelter_positions(&self) -> Vec<LngLat> {
        self.shelter_positions.clone()
    }

    fn open_popup(&mut self, popup: PopupSpec) -> PopupHandle {
        let handle = PopupHandle(self.next_popup);
        self.next_popup += 1;
        self.popups.push(RecordedPopup { handle, spec: popup });
        handle
    }

    fn close_popup(&mut self, handle: PopupHandle) {
        self.popups.retain(|popup| popup.handle != handle);
    }

    fn set_measurement(&mut self, overlay: &MeasureOverlay) {
        self.measurement = overlay.clone();
        self.measure_points
            .retain(|(_, id)| overlay.points.iter().any(|p| p.id == *id));
    }

    fn set_reachable_area(&mut self, area: &MultiPolygon<f64>) {
        self.reachable_area = area.clone();
    }

    fn set_reachable_control_visible(&mut self, visible: bool) {
        self.reachable_control_visible = visible;
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }
}
