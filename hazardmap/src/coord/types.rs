//! Coordinate type definitions

use thiserror::Error;

/// Web Mercator valid latitude range
pub const MIN_LAT: f64 = -85.05112878;
pub const MAX_LAT: f64 = 85.05112878;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Zoom levels accepted by the tile math
pub const MIN_ZOOM: u8 = 0;
pub const MAX_ZOOM: u8 = 22;

/// A geographic position in degrees, longitude first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

impl From<(f64, f64)> for LngLat {
    fn from((lng, lat): (f64, f64)) -> Self {
        Self { lng, lat }
    }
}

/// Tile coordinates in the XYZ slippy-map scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    /// X coordinate (east-west), 0 at west
    pub x: u32,
    /// Y coordinate (north-south), 0 at north
    pub y: u32,
    /// Zoom level
    pub zoom: u8,
}

/// Geographic bounding box of a tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BBox {
    /// Returns true if the position lies inside the box (edges inclusive).
    pub fn contains(&self, pos: LngLat) -> bool {
        (self.west..=self.east).contains(&pos.lng) && (self.south..=self.north).contains(&pos.lat)
    }
}

/// Integer pixel position inside a tile image, origin at the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelOffset {
    pub x: u32,
    pub y: u32,
}

/// Errors that can occur during coordinate conversion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    #[error("Invalid latitude: {0} (must be between {MIN_LAT} and {MAX_LAT})")]
    InvalidLatitude(f64),

    #[error("Invalid longitude: {0} (must be between {MIN_LON} and {MAX_LON})")]
    InvalidLongitude(f64),

    #[error("Invalid zoom level: {0} (must be between {MIN_ZOOM} and {MAX_ZOOM})")]
    InvalidZoom(u8),

    #[error("Point ({lng}, {lat}) lies outside the tile bounding box")]
    OutsideTile { lng: f64, lat: f64 },
}
