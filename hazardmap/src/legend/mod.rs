//! Hazard legends and nearest-color lookup.
//!
//! Each hazard raster layer has an ordered palette mapping rendered colors to
//! risk-category labels. A pixel sampled from the raster is matched to the
//! perceptually closest palette entry.
//!
//! # Example
//!
//! ```
//! use hazardmap::legend::{closest, HazardLegendCatalog, Rgba};
//!
//! let catalog = HazardLegendCatalog::from_json(r##"[{
//!     "id": "flood_layer",
//!     "name": "洪水浸水想定区域",
//!     "guide_color": [
//!         { "color": "#f7f5a9", "label": "0.5m未満" },
//!         { "color": "#ff9191", "label": "5.0~10.0m" }
//!     ]
//! }]"##).unwrap();
//!
//! let legend = catalog.get("flood_layer").unwrap();
//! let guide = closest(&Rgba::opaque(250, 150, 150), &legend.guide_colors).unwrap();
//! assert_eq!(guide.label, "5.0~10.0m");
//! ```

mod catalog;
mod color;
mod matcher;
pub mod render;

pub use catalog::{GuideColor, HazardLegend, HazardLegendCatalog, LegendError};
pub use color::{ColorParseError, Lab, Rgba};
pub use matcher::closest;
