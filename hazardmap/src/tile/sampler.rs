//! Single-pixel sampling from rendered hazard tiles.

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::fetch::{FetchError, TileFetcher};
use super::template::TileUrlTemplate;
use crate::coord::{self, CoordError, LngLat, PixelOffset, TileCoord};
use crate::legend::Rgba;

/// Highest zoom at which hazard imagery is sampled.
pub const DEFAULT_MAX_SAMPLE_ZOOM: u8 = 17;

/// Edge length of the tile image in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// Upper bound accepted for the sampling zoom.
pub const MAX_SAMPLE_ZOOM_LIMIT: u8 = 18;

/// Errors raised while sampling a pixel.
#[derive(Debug, Error)]
pub enum SampleError {
    #[error("Cannot locate sample point: {0}")]
    Coord(#[from] CoordError),

    #[error("Tile fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Tile decode failed: {0}")]
    Decode(String),

    #[error("Pixel ({x}, {y}) outside {width}x{height} tile image")]
    OutOfBounds { x: u32, y: u32, width: u32, height: u32 },

    #[error("Sample cancelled")]
    Cancelled,
}

/// Configuration for pixel sampling.
///
/// # Example
///
/// ```
/// use hazardmap::tile::SamplerConfig;
///
/// let config = SamplerConfig::default().with_max_zoom(16);
/// assert_eq!(config.max_zoom(), 16);
/// assert_eq!(config.tile_size(), 256);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerConfig {
    max_zoom: u8,
    tile_size: u32,
}

impl SamplerConfig {
    /// Set the highest sampling zoom (capped at [`MAX_SAMPLE_ZOOM_LIMIT`]).
    pub fn with_max_zoom(mut self, max_zoom: u8) -> Self {
        self.max_zoom = max_zoom.min(MAX_SAMPLE_ZOOM_LIMIT);
        self
    }

    /// Set the tile image size in pixels (at least 1).
    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size.max(1);
        self
    }

    pub fn max_zoom(&self) -> u8 {
        self.max_zoom
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            max_zoom: DEFAULT_MAX_SAMPLE_ZOOM,
            tile_size: DEFAULT_TILE_SIZE,
        }
    }
}

/// Where to sample: the tile URL and the pixel inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplePlan {
    pub url: String,
    pub tile: TileCoord,
    pub pixel: PixelOffset,
    pub tile_size: u32,
}

impl SamplePlan {
    /// Resolves the tile and pixel under `pos` at the current view zoom.
    pub fn new(
        template: &TileUrlTemplate,
        pos: LngLat,
        view_zoom: f64,
        config: &SamplerConfig,
    ) -> Result<Self, SampleError> {
        let zoom = coord::sampling_zoom(view_zoom, config.max_zoom());
        let tile = coord::point_to_tile(pos.lng, pos.lat, zoom)?;
        let pixel = coord::pixel_in_point_tile(pos, &tile, config.tile_size())?;

        Ok(Self {
            url: template.url(&tile),
            tile,
            pixel,
            tile_size: config.tile_size(),
        })
    }
}

/// Fetches tiles and reads single pixels from them.
pub struct PixelSampler<F> {
    fetcher: F,
}

impl<F: TileFetcher> PixelSampler<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Fetches the planned tile and returns the color of the planned pixel.
    ///
    /// Resolves with [`SampleError::Cancelled`] as soon as `cancel` fires.
    pub async fn sample(
        &self,
        plan: &SamplePlan,
        cancel: &CancellationToken,
    ) -> Result<Rgba, SampleError> {
        let bytes = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(url = %plan.url, "Pixel sample cancelled");
                return Err(SampleError::Cancelled);
            }
            result = self.fetcher.fetch(&plan.url) => result?,
        };

        if cancel.is_cancelled() {
            return Err(SampleError::Cancelled);
        }

        decode_pixel(&bytes, plan.pixel, plan.tile_size)
    }
}

/// Decodes an encoded tile image and reads one pixel.
///
/// The offset is expressed in `tile_size` units; images served at a
/// different resolution are scaled to match.
pub fn decode_pixel(bytes: &[u8], pixel: PixelOffset, tile_size: u32) -> Result<Rgba, SampleError> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| SampleError::Decode(e.to_string()))?
        .to_rgba8();
    let (width, height) = image.dimensions();

    let scale = |v: u32, extent: u32| (u64::from(v) * u64::from(extent) / u64::from(tile_size.max(1))) as u32;
    let x = scale(pixel.x, width);
    let y = scale(pixel.y, height);
    if x >= width || y >= height {
        return Err(SampleError::OutOfBounds { x, y, width, height });
    }

    let [r, g, b, a] = image.get_pixel(x, y).0;
    Ok(Rgba::new(r, g, b, a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::{MockTileFetcher, PendingTileFetcher};
    use image::{ImageFormat, RgbaImage};
    use std::io::Cursor;

    fn encode_png(image: &RgbaImage) -> Vec<u8> {
        let mut buf = Vec::new();
        image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png).unwrap();
        buf
    }

    fn quadrant_tile(size: u32) -> Vec<u8> {
        let half = size / 2;
        let image = RgbaImage::from_fn(size, size, |x, y| match (x < half, y < half) {
            (true, true) => image::Rgba([255, 0, 0, 255]),
            (false, true) => image::Rgba([0, 255, 0, 255]),
            (true, false) => image::Rgba([0, 0, 255, 255]),
            (false, false) => image::Rgba([0, 0, 0, 0]),
        });
        encode_png(&image)
    }

    #[test]
    fn test_config_defaults_and_limits() {
        let config = SamplerConfig::default();
        assert_eq!(config.max_zoom(), 17);
        assert_eq!(config.tile_size(), 256);

        let config = config.with_max_zoom(22).with_tile_size(0);
        assert_eq!(config.max_zoom(), MAX_SAMPLE_ZOOM_LIMIT);
        assert_eq!(config.tile_size(), 1);
    }

    #[test]
    fn test_plan_clamps_zoom() {
        let template = TileUrlTemplate::new("https://tiles.example/{z}/{x}/{y}.png");
        let plan = SamplePlan::new(
            &template,
            LngLat::new(139.7671, 35.6812),
            19.4,
            &SamplerConfig::default(),
        )
        .unwrap();

        assert_eq!(plan.tile.zoom, 17);
        assert_eq!(plan.tile.x, 116423);
        assert_eq!(plan.tile.y, 51613);
        assert_eq!(plan.url, "https://tiles.example/17/116423/51613.png");
        assert!(plan.pixel.x < 256 && plan.pixel.y < 256);
    }

    #[test]
    fn test_plan_rounds_fractional_zoom() {
        let template = TileUrlTemplate::new("{z}");
        let plan = SamplePlan::new(&template, LngLat::new(0.5, 0.5), 12.5, &SamplerConfig::default()).unwrap();
        assert_eq!(plan.tile.zoom, 13);
        let plan = SamplePlan::new(&template, LngLat::new(0.5, 0.5), 12.49, &SamplerConfig::default()).unwrap();
        assert_eq!(plan.tile.zoom, 12);
    }

    #[test]
    fn test_plan_rejects_polar_point() {
        let template = TileUrlTemplate::new("{z}/{x}/{y}");
        let result = SamplePlan::new(&template, LngLat::new(0.0, 89.0), 10.0, &SamplerConfig::default());
        assert!(matches!(result, Err(SampleError::Coord(CoordError::InvalidLatitude(_)))));
    }

    #[test]
    fn test_plan_at_world_edges() {
        let template = TileUrlTemplate::new("{z}/{x}/{y}");
        let config = SamplerConfig::default();

        let antimeridian = SamplePlan::new(&template, LngLat::new(180.0, 35.0), 17.0, &config).unwrap();
        assert_eq!(antimeridian.tile.x, 0);
        assert_eq!(antimeridian.pixel.x, 0);

        let south = SamplePlan::new(&template, LngLat::new(10.0, coord::MIN_LAT), 17.0, &config).unwrap();
        assert_eq!(south.tile.y, (1 << 17) - 1);
        assert_eq!(south.pixel.y, 255);
    }

    #[test]
    fn test_decode_pixel_quadrants() {
        let png = quadrant_tile(256);
        let px = |x, y| decode_pixel(&png, PixelOffset { x, y }, 256).unwrap();

        assert_eq!(px(10, 10), Rgba::opaque(255, 0, 0));
        assert_eq!(px(200, 10), Rgba::opaque(0, 255, 0));
        assert_eq!(px(10, 200), Rgba::opaque(0, 0, 255));
        assert!(px(255, 255).is_transparent());
    }

    #[test]
    fn test_decode_pixel_scales_high_resolution_tiles() {
        let png = quadrant_tile(512);
        let color = decode_pixel(&png, PixelOffset { x: 200, y: 10 }, 256).unwrap();
        assert_eq!(color, Rgba::opaque(0, 255, 0));
    }

    #[test]
    fn test_decode_garbage_fails() {
        let result = decode_pixel(b"not an image", PixelOffset { x: 0, y: 0 }, 256);
        assert!(matches!(result, Err(SampleError::Decode(_))));
    }

    fn plan_at(pixel: PixelOffset) -> SamplePlan {
        SamplePlan {
            url: "https://tiles.example/1/1/1.png".to_string(),
            tile: TileCoord { x: 1, y: 1, zoom: 1 },
            pixel,
            tile_size: 256,
        }
    }

    #[tokio::test]
    async fn test_sample_reads_pixel() {
        let sampler = PixelSampler::new(MockTileFetcher {
            response: Ok(quadrant_tile(256)),
        });
        let color = sampler
            .sample(&plan_at(PixelOffset { x: 10, y: 200 }), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(color, Rgba::opaque(0, 0, 255));
    }

    #[tokio::test]
    async fn test_sample_fetch_failure_resolves() {
        let sampler = PixelSampler::new(MockTileFetcher {
            response: Err(FetchError::Request("connection refused".to_string())),
        });
        let result = sampler
            .sample(&plan_at(PixelOffset { x: 0, y: 0 }), &CancellationToken::new())
            .await;
        assert!(matches!(result, Err(SampleError::Fetch(_))));
    }

    #[tokio::test]
    async fn test_sample_cancelled_while_fetching() {
        let sampler = PixelSampler::new(PendingTileFetcher);
        let cancel = CancellationToken::new();
        let plan = plan_at(PixelOffset { x: 0, y: 0 });

        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::task::yield_now().await;
            canceller.cancel();
        });

        let result = sampler.sample(&plan, &cancel).await;
        assert!(matches!(result, Err(SampleError::Cancelled)));
    }

    #[tokio::test]
    async fn test_sample_already_cancelled() {
        let sampler = PixelSampler::new(MockTileFetcher {
            response: Ok(quadrant_tile(256)),
        });
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = sampler.sample(&plan_at(PixelOffset { x: 0, y: 0 }), &cancel).await;
        assert!(matches!(result, Err(SampleError::Cancelled)));
    }
}
