//! Coordinate conversion module
//!
//! Provides conversions between geographic coordinates and Web Mercator
//! XYZ tile coordinates, plus the tile-local pixel lookup used when sampling
//! a rendered hazard raster.

mod types;

pub use types::{
    BBox, CoordError, LngLat, PixelOffset, TileCoord, MAX_LAT, MAX_LON, MAX_ZOOM, MIN_LAT,
    MIN_LON, MIN_ZOOM,
};

use std::f64::consts::PI;

/// Converts a geographic position to the tile containing it.
///
/// # Arguments
///
/// * `lng` - Longitude in degrees (-180.0 to 180.0)
/// * `lat` - Latitude in degrees (-85.05112878 to 85.05112878)
/// * `zoom` - Zoom level (0 to 22)
///
/// Longitude 180 wraps onto column 0, matching the slippy-map convention.
#[inline]
pub fn point_to_tile(lng: f64, lat: f64, zoom: u8) -> Result<TileCoord, CoordError> {
    if !(MIN_LAT..=MAX_LAT).contains(&lat) {
        return Err(CoordError::InvalidLatitude(lat));
    }
    if !(MIN_LON..=MAX_LON).contains(&lng) {
        return Err(CoordError::InvalidLongitude(lng));
    }
    if zoom > MAX_ZOOM {
        return Err(CoordError::InvalidZoom(zoom));
    }

    let n = 2.0_f64.powi(zoom as i32);
    let tiles = 1_u64 << zoom;

    let x = ((lng + 180.0) / 360.0 * n).floor() as u64 % tiles;

    let lat_rad = lat.to_radians();
    let y = ((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n).floor() as u64;
    let y = y.min(tiles - 1);

    Ok(TileCoord {
        x: x as u32,
        y: y as u32,
        zoom,
    })
}

/// Returns the longitude of a tile column's western edge.
#[inline]
fn tile_to_lng(x: u32, n: f64) -> f64 {
    x as f64 / n * 360.0 - 180.0
}

/// Returns the latitude of a tile row's northern edge.
#[inline]
fn tile_to_lat(y: u32, n: f64) -> f64 {
    (PI * (1.0 - 2.0 * y as f64 / n)).sinh().atan().to_degrees()
}

/// Returns the geographic bounding box of a tile.
pub fn tile_bbox(tile: &TileCoord) -> BBox {
    let n = 2.0_f64.powi(tile.zoom as i32);
    BBox {
        west: tile_to_lng(tile.x, n),
        south: tile_to_lat(tile.y + 1, n),
        east: tile_to_lng(tile.x + 1, n),
        north: tile_to_lat(tile.y, n),
    }
}

/// Clamps a fractional view zoom to the zoom used for tile sampling.
///
/// The view zoom is rounded to the nearest integer and capped at
/// `max_zoom`, since imagery may not exist beyond it.
pub fn sampling_zoom(view_zoom: f64, max_zoom: u8) -> u8 {
    if !view_zoom.is_finite() || view_zoom <= 0.0 {
        return MIN_ZOOM;
    }
    view_zoom.round().min(f64::from(max_zoom)) as u8
}

/// Locates a position inside a tile image of `tile_size` × `tile_size` pixels.
///
/// Longitude and latitude are linearly interpolated against the bounding box
/// edges and truncated to whole pixels. A position on the east or south edge
/// maps to the last pixel rather than one past it.
pub fn pixel_in_tile(pos: LngLat, bbox: &BBox, tile_size: u32) -> Result<PixelOffset, CoordError> {
    if !bbox.contains(pos) {
        return Err(CoordError::OutsideTile {
            lng: pos.lng,
            lat: pos.lat,
        });
    }

    let size = f64::from(tile_size);
    let fx = (pos.lng - bbox.west) / (bbox.east - bbox.west) * size;
    let fy = (bbox.north - pos.lat) / (bbox.north - bbox.south) * size;

    let last = tile_size.saturating_sub(1);
    Ok(PixelOffset {
        x: (fx as u32).min(last),
        y: (fy as u32).min(last),
    })
}

/// Locates a position inside the tile returned for it by [`point_to_tile`].
///
/// Longitude 180 is moved onto the western edge of column 0. Latitudes at
/// the Mercator limits sit a hair outside the outermost rows, so they are
/// snapped onto the first or last row's edge.
pub fn pixel_in_point_tile(pos: LngLat, tile: &TileCoord, tile_size: u32) -> Result<PixelOffset, CoordError> {
    let bbox = tile_bbox(tile);
    let last_row = (1_u32 << tile.zoom) - 1;

    let lng = if pos.lng > bbox.east { pos.lng - 360.0 } else { pos.lng };
    let lat = if tile.y == 0 && pos.lat > bbox.north {
        bbox.north
    } else if tile.y == last_row && pos.lat < bbox.south {
        bbox.south
    } else {
        pos.lat
    };

    pixel_in_tile(LngLat::new(lng, lat), &bbox, tile_size)
}
