//! Reachable-area buffering around shelters.

use geo::{BooleanOps, HaversineDestination, LineString, MultiPolygon, Point, Polygon};

use crate::coord::LngLat;

/// View zoom below which the reachable area is hidden.
pub const DEFAULT_REACHABLE_MIN_ZOOM: f64 = 13.0;

/// Vertices per buffer circle.
pub const DEFAULT_CIRCLE_STEPS: usize = 32;

/// Fewest vertices accepted for a buffer circle.
pub const MIN_CIRCLE_STEPS: usize = 4;

/// Configuration for reachable-area drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReachableAreaConfig {
    min_zoom: f64,
    circle_steps: usize,
}

impl ReachableAreaConfig {
    pub fn with_min_zoom(mut self, min_zoom: f64) -> Self {
        self.min_zoom = min_zoom;
        self
    }

    /// Set the vertex count of each circle (at least [`MIN_CIRCLE_STEPS`]).
    pub fn with_circle_steps(mut self, steps: usize) -> Self {
        self.circle_steps = steps.max(MIN_CIRCLE_STEPS);
        self
    }

    pub fn min_zoom(&self) -> f64 {
        self.min_zoom
    }

    pub fn circle_steps(&self) -> usize {
        self.circle_steps
    }

    /// Returns true if the area is drawn at this view zoom.
    pub fn is_enabled_at(&self, zoom: f64) -> bool {
        zoom >= self.min_zoom
    }
}

impl Default for ReachableAreaConfig {
    fn default() -> Self {
        Self {
            min_zoom: DEFAULT_REACHABLE_MIN_ZOOM,
            circle_steps: DEFAULT_CIRCLE_STEPS,
        }
    }
}

/// Slider label for a radius.
pub fn reachable_area_label(meters: u32) -> String {
    format!("避難所の到達圏 {} m", meters)
}

/// Polygon approximating the great circle of `radius_m` metres around `center`.
pub fn geodesic_circle(center: LngLat, radius_m: f64, steps: usize) -> Polygon<f64> {
    let steps = steps.max(MIN_CIRCLE_STEPS);
    let origin = Point::new(center.lng, center.lat);
    let ring: Vec<(f64, f64)> = (0..steps)
        .map(|i| {
            let bearing = -360.0 * i as f64 / steps as f64;
            let p = origin.haversine_destination(bearing, radius_m);
            (p.x(), p.y())
        })
        .collect();
    Polygon::new(LineString::from(ring), Vec::new())
}

/// Buffers every center by `radius_m` and dissolves the circles into one area.
///
/// A zero or negative radius, or no centers, yields an empty area.
pub fn reachable_area(centers: &[LngLat], radius_m: f64, config: &ReachableAreaConfig) -> MultiPolygon<f64> {
    if radius_m <= 0.0 || !radius_m.is_finite() {
        return MultiPolygon::new(Vec::new());
    }

    let mut circles = centers
        .iter()
        .map(|c| geodesic_circle(*c, radius_m, config.circle_steps()));

    let Some(first) = circles.next() else {
        return MultiPolygon::new(Vec::new());
    };

    let area = circles.fold(MultiPolygon::new(vec![first]), |acc, circle| {
        acc.union(&MultiPolygon::new(vec![circle]))
    });

    tracing::debug!(
        shelters = centers.len(),
        radius_m = radius_m,
        parts = area.0.len(),
        "Dissolved reachable area"
    );
    area
}
