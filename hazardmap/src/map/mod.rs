//! Map host abstraction.
//!
//! The rendering library, DOM and event loop live outside this crate. Every
//! control and the session talk to them through [`MapHost`], which exposes
//! only the operations they need: layer properties, rendered feature queries,
//! popups and GeoJSON overlay updates.

mod recording;

pub use recording::{LayerState, RecordedPopup, RecordingHost};

use geo::MultiPolygon;

use crate::coord::LngLat;
use crate::measure::MeasureOverlay;
use crate::shelter::ShelterId;
use crate::tile::TileUrlTemplate;

/// Layout visibility of a map layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    None,
}

impl Visibility {
    pub fn is_visible(self) -> bool {
        matches!(self, Visibility::Visible)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Visible => "visible",
            Visibility::None => "none",
        }
    }
}

impl From<bool> for Visibility {
    fn from(visible: bool) -> Self {
        if visible {
            Visibility::Visible
        } else {
            Visibility::None
        }
    }
}

/// Pointer position in screen pixels, origin at the top-left of the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A pointer event on the map: where on screen and where on the ground.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapEvent {
    pub point: ScreenPoint,
    pub lng_lat: LngLat,
}

impl MapEvent {
    pub fn new(point: ScreenPoint, lng_lat: LngLat) -> Self {
        Self { point, lng_lat }
    }
}

/// Canvas cursor style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    Pointer,
    Crosshair,
}

/// A popup to open on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupSpec {
    pub position: LngLat,
    pub html: String,
    /// Pixel offset of the popup anchor
    pub offset: (i32, i32),
    /// Place a marker at `position` that is removed with the popup
    pub marker: bool,
}

/// Identifies an open popup so it can be closed later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PopupHandle(pub u64);

/// Operations the hazard map needs from the map-rendering host.
pub trait MapHost {
    /// Current fractional view zoom.
    fn zoom(&self) -> f64;

    fn set_layer_visibility(&mut self, layer_id: &str, visibility: Visibility);

    /// Sets a raster layer's opacity (0.0 to 1.0).
    fn set_layer_opacity(&mut self, layer_id: &str, opacity: f64);

    /// Tile URL template of a raster layer's source.
    fn raster_tile_template(&self, layer_id: &str) -> Option<TileUrlTemplate>;

    /// Shelter feature rendered under the pointer, if any.
    fn shelter_at(&self, point: ScreenPoint) -> Option<ShelterId>;

    /// Distance-measurement point rendered under the pointer, if any.
    fn measure_point_at(&self, point: ScreenPoint) -> Option<u64>;

    /// Positions of all shelter features currently loaded in the viewport.
    fn rendered_shelter_positions(&self) -> Vec<LngLat>;

    fn open_popup(&mut self, popup: PopupSpec) -> PopupHandle;

    fn close_popup(&mut self, handle: PopupHandle);

    /// Replaces the distance-measurement overlay.
    fn set_measurement(&mut self, overlay: &MeasureOverlay);

    /// Replaces the reachable-area overlay. An empty polygon clears it.
    fn set_reachable_area(&mut self, area: &MultiPolygon<f64>);

    /// Shows or hides the reachable-area slider.
    fn set_reachable_control_visible(&mut self, visible: bool);

    fn set_cursor(&mut self, cursor: Cursor);
}
