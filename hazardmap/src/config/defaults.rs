//! Default values for all configuration settings.
//!
//! Runtime defaults are owned by the modules that use them; this file wires
//! them into `ConfigFile::default()`.

pub use crate::measure::{DEFAULT_CIRCLE_STEPS, DEFAULT_REACHABLE_MIN_ZOOM, MIN_CIRCLE_STEPS};
pub use crate::search::{DEFAULT_SEARCH_DISTANCE, DEFAULT_SEARCH_THRESHOLD};
pub use crate::tile::{DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_MAX_SAMPLE_ZOOM, DEFAULT_TILE_SIZE, MAX_SAMPLE_ZOOM_LIMIT};

use super::settings::*;

/// Default log file name inside the config directory.
pub const DEFAULT_LOG_FILE_NAME: &str = "hazardmap.log";

impl Default for ConfigFile {
    fn default() -> Self {
        let config_dir = super::file::config_directory();

        Self {
            search: SearchSettings {
                threshold: DEFAULT_SEARCH_THRESHOLD,
                distance: DEFAULT_SEARCH_DISTANCE,
            },
            hazard: HazardSettings {
                max_sample_zoom: DEFAULT_MAX_SAMPLE_ZOOM,
                tile_size: DEFAULT_TILE_SIZE,
                fetch_timeout: DEFAULT_FETCH_TIMEOUT_SECS,
                legend_file: None,
            },
            reachable_area: ReachableAreaSettings {
                min_zoom: DEFAULT_REACHABLE_MIN_ZOOM,
                circle_steps: DEFAULT_CIRCLE_STEPS,
            },
            data: DataSettings::default(),
            logging: LoggingSettings {
                file: config_dir.join(DEFAULT_LOG_FILE_NAME),
            },
        }
    }
}
