//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

use crate::shelter::FieldSchema;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Shelter search settings
    pub search: SearchSettings,
    /// Hazard raster sampling and legend settings
    pub hazard: HazardSettings,
    /// Reachable-area drawing settings
    pub reachable_area: ReachableAreaSettings,
    /// Static data documents
    pub data: DataSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Fuzzy search configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSettings {
    /// Highest accepted match score, 0.0 (exact) to 1.0 (anything)
    pub threshold: f64,
    /// Divisor of the match-position penalty
    pub distance: f64,
}

/// Hazard layer configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct HazardSettings {
    /// Highest zoom at which hazard tiles are sampled
    pub max_sample_zoom: u8,
    /// Tile image edge length in pixels
    pub tile_size: u32,
    /// Timeout in seconds for tile requests
    pub fetch_timeout: u64,
    /// Hazard legend JSON document
    pub legend_file: Option<PathBuf>,
}

/// Reachable-area configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ReachableAreaSettings {
    /// View zoom below which the area is hidden
    pub min_zoom: f64,
    /// Vertices per buffer circle
    pub circle_steps: usize,
}

/// One shelter dataset to load.
#[derive(Debug, Clone, PartialEq)]
pub struct ShelterSource {
    pub path: PathBuf,
    pub schema: FieldSchema,
}

/// Static data configuration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataSettings {
    /// Shelter datasets, loaded in order
    pub shelter_files: Vec<ShelterSource>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Log file path
    pub file: PathBuf,
}
