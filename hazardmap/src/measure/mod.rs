//! Client-side geometry: distance measurement and reachable-area buffers.

mod distance;
mod reachable;

pub use distance::{format_km, DistanceSession, MeasureOverlay, MeasurePoint};
pub use reachable::{
    geodesic_circle, reachable_area, reachable_area_label, ReachableAreaConfig, DEFAULT_CIRCLE_STEPS,
    DEFAULT_REACHABLE_MIN_ZOOM, MIN_CIRCLE_STEPS,
};
