//! Hazard legend catalog loaded from static configuration.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use super::color::Rgba;

/// Errors raised while loading a legend document.
#[derive(Debug, Error)]
pub enum LegendError {
    #[error("Legend file not found at: {0}")]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed legend document: {0}")]
    Json(#[from] serde_json::Error),
}

/// One palette entry: a rendered raster color and its risk-category label.
#[derive(Debug, Clone, PartialEq)]
pub struct GuideColor {
    /// Color as written in the legend document, used for display
    pub css: String,
    pub color: Rgba,
    pub label: String,
}

/// Ordered palette for one hazard layer.
#[derive(Debug, Clone, PartialEq)]
pub struct HazardLegend {
    pub id: String,
    pub name: String,
    pub guide_colors: Vec<GuideColor>,
}

#[derive(Debug, Deserialize)]
struct LegendDoc {
    id: String,
    name: String,
    guide_color: Vec<GuideColorDoc>,
}

#[derive(Debug, Deserialize)]
struct GuideColorDoc {
    color: String,
    label: String,
}

/// All known hazard legends, in document order.
#[derive(Debug, Clone, Default)]
pub struct HazardLegendCatalog {
    legends: Vec<HazardLegend>,
}

impl HazardLegendCatalog {
    pub fn new(legends: Vec<HazardLegend>) -> Self {
        Self { legends }
    }

    /// Parses a legend document: `[{ "id", "name", "guide_color": [{ "color", "label" }] }]`.
    ///
    /// An entry with an unparseable color, or an empty palette, is dropped
    /// with a warning; lookups for its layer then report no legend.
    pub fn from_json(json: &str) -> Result<Self, LegendError> {
        let docs: Vec<LegendDoc> = serde_json::from_str(json)?;
        Ok(Self::from_docs(docs))
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, LegendError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(LegendError::NotFound(path.to_path_buf()));
        }
        let docs: Vec<LegendDoc> = serde_json::from_reader(BufReader::new(File::open(path)?))?;
        let catalog = Self::from_docs(docs);
        tracing::info!(path = %path.display(), count = catalog.len(), "Loaded hazard legends");
        Ok(catalog)
    }

    fn from_docs(docs: Vec<LegendDoc>) -> Self {
        let legends = docs.into_iter().filter_map(convert).collect();
        Self { legends }
    }

    /// Returns the legend for a hazard layer, if one is known.
    pub fn get(&self, layer_id: &str) -> Option<&HazardLegend> {
        self.legends.iter().find(|legend| legend.id == layer_id)
    }

    /// Palette entries for a hazard layer, in legend order.
    pub fn legend_entries(&self, layer_id: &str) -> Option<&[GuideColor]> {
        self.get(layer_id).map(|legend| legend.guide_colors.as_slice())
    }

    /// Legends in document order.
    pub fn legends(&self) -> impl Iterator<Item = &HazardLegend> {
        self.legends.iter()
    }

    pub fn len(&self) -> usize {
        self.legends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.legends.is_empty()
    }
}

fn convert(doc: LegendDoc) -> Option<HazardLegend> {
    if doc.guide_color.is_empty() {
        tracing::warn!(layer = %doc.id, "Hazard legend has no colors, ignoring");
        return None;
    }

    let mut guide_colors = Vec::with_capacity(doc.guide_color.len());
    for entry in doc.guide_color {
        match entry.color.parse::<Rgba>() {
            Ok(color) => guide_colors.push(GuideColor {
                css: entry.color,
                color,
                label: entry.label,
            }),
            Err(e) => {
                tracing::warn!(layer = %doc.id, error = %e, "Malformed hazard legend, ignoring");
                return None;
            }
        }
    }

    Some(HazardLegend {
        id: doc.id,
        name: doc.name,
        guide_colors,
    })
}
