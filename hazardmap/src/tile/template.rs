//! XYZ tile URL templates.

use std::fmt;

use crate::coord::TileCoord;

/// A raster tile URL with `{z}`, `{x}` and `{y}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileUrlTemplate(String);

impl TileUrlTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Substitutes the tile coordinates into the template.
    pub fn url(&self, tile: &TileCoord) -> String {
        self.0
            .replace("{z}", &tile.zoom.to_string())
            .replace("{x}", &tile.x.to_string())
            .replace("{y}", &tile.y.to_string())
    }
}

impl fmt::Display for TileUrlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
