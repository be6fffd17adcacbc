//! Hazard raster tiles.
//!
//! Builds tile URLs from XYZ templates, fetches tile images and reads the
//! single pixel under a map position.

mod fetch;
mod sampler;
mod template;

pub use fetch::{FetchError, ReqwestTileFetcher, TileFetcher, DEFAULT_FETCH_TIMEOUT_SECS};
pub use sampler::{
    decode_pixel, PixelSampler, SampleError, SamplePlan, SamplerConfig, DEFAULT_MAX_SAMPLE_ZOOM,
    DEFAULT_TILE_SIZE, MAX_SAMPLE_ZOOM_LIMIT,
};
pub use template::TileUrlTemplate;

#[cfg(test)]
pub(crate) use fetch::tests::{MockTileFetcher, PendingTileFetcher};
